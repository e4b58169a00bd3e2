// SPDX-License-Identifier: MIT

//! Responses collected so far in one survey submission

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::campaign::condition::ResponseLookup;
use crate::campaign::response::PromptResponse;

/// The latest response to each prompt, keyed by prompt id.
///
/// Inside a repeatable set a new iteration overwrites the previous one, so
/// conditions always see the current iteration.
#[derive(Debug, Clone, Default)]
pub struct ResponseContext {
    responses: HashMap<String, PromptResponse>,
}

impl ResponseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a response, replacing any earlier one for the same prompt
    pub fn insert(&mut self, response: PromptResponse) -> Option<PromptResponse> {
        self.responses
            .insert(response.prompt_id().to_string(), response)
    }

    pub fn get(&self, prompt_id: &str) -> Option<&PromptResponse> {
        self.responses.get(prompt_id)
    }

    pub fn remove(&mut self, prompt_id: &str) -> Option<PromptResponse> {
        self.responses.remove(prompt_id)
    }

    pub fn contains(&self, prompt_id: &str) -> bool {
        self.responses.contains_key(prompt_id)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Get all prompt ids with a response
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.responses.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptResponse> {
        self.responses.values()
    }

    /// Convert to a JSON object of prompt id to value
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.responses
                .iter()
                .map(|(id, response)| {
                    let value = serde_json::to_value(response.value()).unwrap_or(Value::Null);
                    (id.clone(), value)
                })
                .collect::<Map<String, Value>>(),
        )
    }
}

impl ResponseLookup for ResponseContext {
    fn response(&self, prompt_id: &str) -> Option<&PromptResponse> {
        self.get(prompt_id)
    }
}

impl FromIterator<PromptResponse> for ResponseContext {
    fn from_iter<I: IntoIterator<Item = PromptResponse>>(iter: I) -> Self {
        let mut context = Self::new();
        for response in iter {
            context.insert(response);
        }
        context
    }
}
