// SPDX-License-Identifier: MIT

//! Free text prompts

use super::{validate_no_response, validate_no_response_pair, Prompt, PromptType};
use crate::campaign::condition::{ConditionValuePair, Literal};
use crate::campaign::response::{NoResponse, RawValue, ResponseValue};
use crate::error::DomainError;

/// Free text, optionally length-limited (in characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPrompt {
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl TextPrompt {
    pub fn new(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn check_properties(&self, prompt_id: &str) -> Result<(), DomainError> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min > max => Err(DomainError::invalid_properties(
                prompt_id,
                format!("min length {} is greater than max length {}", min, max),
            )),
            _ => Ok(()),
        }
    }
}

impl PromptType for TextPrompt {
    fn validate_condition_value_pair(
        &self,
        prompt: &Prompt,
        pair: &ConditionValuePair,
    ) -> Result<(), DomainError> {
        match &pair.value {
            Literal::Text(_) => Ok(()),
            Literal::NoResponse(_) => validate_no_response_pair(prompt, pair),
            Literal::Number(_) => Err(DomainError::illegal_condition(
                prompt.id(),
                pair,
                "text prompts can only be compared with text",
            )),
        }
    }

    fn validate_value(
        &self,
        prompt: &Prompt,
        value: RawValue,
    ) -> Result<ResponseValue, DomainError> {
        let text = match value {
            RawValue::NoResponse(no_response) => return validate_no_response(prompt, no_response),
            RawValue::Text(text) => text,
            other => {
                return Err(DomainError::invalid_value(
                    prompt.id(),
                    format!("a {} value is not text", other.kind()),
                ))
            }
        };

        if let Ok(no_response) = text.parse::<NoResponse>() {
            return validate_no_response(prompt, no_response);
        }

        let length = text.chars().count();
        if let Some(min) = self.min_length {
            if length < min {
                return Err(DomainError::invalid_value(
                    prompt.id(),
                    format!("text must be at least {} characters long", min),
                ));
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return Err(DomainError::invalid_value(
                    prompt.id(),
                    format!("text must be at most {} characters long", max),
                ));
            }
        }
        Ok(ResponseValue::Text(text))
    }
}
