// SPDX-License-Identifier: MIT

//! The realized answer to a prompt within one survey submission

use serde::{Serialize, Serializer};
use std::sync::Arc;

use super::value::ResponseValue;
use crate::campaign::prompt::Prompt;
use crate::error::DomainError;

/// A validated answer to a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptResponse {
    prompt: Arc<Prompt>,
    repeatable_set_iteration: Option<u32>,
    value: ResponseValue,
}

impl PromptResponse {
    /// Wrap an already validated value.
    ///
    /// The iteration must be present exactly when the prompt belongs to a
    /// repeatable set, and must not be negative.
    pub fn new(
        prompt: Arc<Prompt>,
        repeatable_set_iteration: Option<i64>,
        value: ResponseValue,
    ) -> Result<Self, DomainError> {
        let iteration = match (prompt.repeatable_set(), repeatable_set_iteration) {
            (Some(_), None) => {
                return Err(DomainError::MissingIteration {
                    prompt_id: prompt.id().to_string(),
                })
            }
            (_, Some(iteration)) if iteration < 0 => {
                return Err(DomainError::NegativeIteration {
                    prompt_id: prompt.id().to_string(),
                    iteration,
                })
            }
            (None, Some(iteration)) => {
                return Err(DomainError::UnexpectedIteration {
                    prompt_id: prompt.id().to_string(),
                    iteration,
                })
            }
            (Some(_), Some(iteration)) => {
                Some(u32::try_from(iteration).map_err(|_| {
                    DomainError::invalid_value(prompt.id(), "repeatable set iteration is too large")
                })?)
            }
            (None, None) => None,
        };

        Ok(Self {
            prompt,
            repeatable_set_iteration: iteration,
            value,
        })
    }

    pub fn prompt(&self) -> &Arc<Prompt> {
        &self.prompt
    }

    pub fn prompt_id(&self) -> &str {
        self.prompt.id()
    }

    pub fn repeatable_set_iteration(&self) -> Option<u32> {
        self.repeatable_set_iteration
    }

    pub fn value(&self) -> &ResponseValue {
        &self.value
    }
}

/// Field names follow `schema::JSON_KEY_PROMPT_ID` / `schema::JSON_KEY_RESPONSE`
#[derive(Serialize)]
struct ResponseRecord<'a> {
    prompt_id: &'a str,
    value: &'a ResponseValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    repeatable_set_iteration: Option<u32>,
}

impl Serialize for PromptResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ResponseRecord {
            prompt_id: self.prompt.id(),
            value: &self.value,
            repeatable_set_iteration: self.repeatable_set_iteration,
        }
        .serialize(serializer)
    }
}
