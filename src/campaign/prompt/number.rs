// SPDX-License-Identifier: MIT

//! Number prompts

use super::{validate_no_response, validate_no_response_pair, Prompt, PromptType};
use crate::campaign::condition::{ConditionValuePair, Literal};
use crate::campaign::response::{NoResponse, RawValue, ResponseValue};
use crate::error::DomainError;

/// A numeric answer, optionally bounded and restricted to whole numbers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberPrompt {
    min: Option<f64>,
    max: Option<f64>,
    whole_number: bool,
}

impl NumberPrompt {
    pub fn new(min: Option<f64>, max: Option<f64>, whole_number: bool) -> Self {
        Self {
            min,
            max,
            whole_number,
        }
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn whole_number(&self) -> bool {
        self.whole_number
    }

    pub fn check_properties(&self, prompt_id: &str) -> Result<(), DomainError> {
        for (name, bound) in [("min", self.min), ("max", self.max)] {
            if let Some(bound) = bound {
                if !bound.is_finite() {
                    return Err(DomainError::invalid_properties(
                        prompt_id,
                        format!("{} must be a finite number", name),
                    ));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(DomainError::invalid_properties(
                    prompt_id,
                    format!("min {} is greater than max {}", min, max),
                ));
            }
        }
        Ok(())
    }

    /// Why `n` is not an acceptable answer, if it isn't
    fn violation(&self, n: f64) -> Option<String> {
        if !n.is_finite() {
            return Some(format!("{} is not a finite number", n));
        }
        if self.whole_number && n.fract() != 0.0 {
            return Some(format!("{} is not a whole number", n));
        }
        if let Some(min) = self.min {
            if n < min {
                return Some(format!("{} is less than the minimum {}", n, min));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Some(format!("{} is greater than the maximum {}", n, max));
            }
        }
        None
    }
}

impl PromptType for NumberPrompt {
    fn validate_condition_value_pair(
        &self,
        prompt: &Prompt,
        pair: &ConditionValuePair,
    ) -> Result<(), DomainError> {
        match &pair.value {
            Literal::NoResponse(_) => validate_no_response_pair(prompt, pair),
            Literal::Number(n) => match self.violation(*n) {
                Some(reason) => Err(DomainError::illegal_condition(prompt.id(), pair, reason)),
                None => Ok(()),
            },
            Literal::Text(_) => Err(DomainError::illegal_condition(
                prompt.id(),
                pair,
                "number prompts can only be compared with numbers",
            )),
        }
    }

    fn validate_value(
        &self,
        prompt: &Prompt,
        value: RawValue,
    ) -> Result<ResponseValue, DomainError> {
        let n = match value {
            RawValue::NoResponse(no_response) => return validate_no_response(prompt, no_response),
            RawValue::Number(n) => n,
            RawValue::Text(text) => {
                let text = text.trim();
                if let Ok(no_response) = text.parse::<NoResponse>() {
                    return validate_no_response(prompt, no_response);
                }
                text.parse::<f64>().map_err(|_| {
                    DomainError::invalid_value(
                        prompt.id(),
                        format!("the string '{}' is not a number", text),
                    )
                })?
            }
            other => {
                return Err(DomainError::invalid_value(
                    prompt.id(),
                    format!("a {} value is not a number", other.kind()),
                ))
            }
        };

        match self.violation(n) {
            Some(reason) => Err(DomainError::invalid_value(prompt.id(), reason)),
            None => Ok(ResponseValue::Number(n)),
        }
    }
}
