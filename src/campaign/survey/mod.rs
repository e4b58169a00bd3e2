// SPDX-License-Identifier: MIT

//! Surveys and the walk through their prompts
//!
//! A survey is an ordered list of items. Each item is a single prompt or a
//! repeatable set of prompts that may be answered several times.

mod context;
mod run;

pub use context::ResponseContext;
pub use run::{Submission, SurveyRun};

use std::sync::Arc;

use crate::campaign::prompt::Prompt;

/// A group of prompts answered once per iteration
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatableSet {
    id: String,
    prompts: Vec<Arc<Prompt>>,
}

impl RepeatableSet {
    pub fn new(id: impl Into<String>, prompts: Vec<Arc<Prompt>>) -> Self {
        Self {
            id: id.into(),
            prompts,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompts(&self) -> &[Arc<Prompt>] {
        &self.prompts
    }
}

/// One entry in a survey
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyItem {
    Prompt(Arc<Prompt>),
    RepeatableSet(RepeatableSet),
}

/// A compiled survey
#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    id: String,
    title: String,
    description: Option<String>,
    items: Vec<SurveyItem>,
}

impl Survey {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        items: Vec<SurveyItem>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description,
            items,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn items(&self) -> &[SurveyItem] {
        &self.items
    }

    /// All prompts in document order, including those inside repeatable sets
    pub fn prompts(&self) -> impl Iterator<Item = &Arc<Prompt>> {
        self.items.iter().flat_map(|item| match item {
            SurveyItem::Prompt(prompt) => std::slice::from_ref(prompt),
            SurveyItem::RepeatableSet(set) => set.prompts(),
        })
    }

    pub fn prompt(&self, prompt_id: &str) -> Option<&Arc<Prompt>> {
        self.prompts().find(|prompt| prompt.id() == prompt_id)
    }
}
