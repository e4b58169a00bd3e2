// SPDX-License-Identifier: MIT

//! Survey campaigns
//!
//! A campaign groups surveys. Surveys hold prompts whose display conditions
//! are compiled and checked when the campaign is loaded.

pub mod condition;
pub mod definition;
pub mod loader;
pub mod prompt;
pub mod response;
pub mod survey;

pub use definition::RunningState;
pub use loader::CampaignLoader;

use std::sync::Arc;

use crate::error::CampaignError;
use survey::{Survey, SurveyRun};

/// A compiled campaign
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    id: String,
    name: String,
    description: Option<String>,
    running_state: RunningState,
    surveys: Vec<Arc<Survey>>,
}

impl Campaign {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        running_state: RunningState,
        surveys: Vec<Arc<Survey>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description,
            running_state,
            surveys,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn running_state(&self) -> RunningState {
        self.running_state
    }

    pub fn surveys(&self) -> &[Arc<Survey>] {
        &self.surveys
    }

    pub fn survey(&self, survey_id: &str) -> Option<&Arc<Survey>> {
        self.surveys.iter().find(|survey| survey.id() == survey_id)
    }

    /// Start a submission of one of this campaign's surveys
    pub fn start(&self, survey_id: &str) -> Result<SurveyRun, CampaignError> {
        SurveyRun::start(self, survey_id)
    }
}
