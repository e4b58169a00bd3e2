// SPDX-License-Identifier: MIT

//! Typed error handling for campaign-rs
//!
//! Condition syntax problems surface as [`ParseError`], semantic violations
//! as [`DomainError`], and everything is collected under [`CampaignError`].

use thiserror::Error;

/// Top-level error type for campaign-rs
#[derive(Debug, Error)]
pub enum CampaignError {
    /// A prompt's condition could not be parsed
    #[error("Invalid condition for prompt '{prompt_id}': {source}")]
    Condition {
        prompt_id: String,
        #[source]
        source: ParseError,
    },

    /// Semantic violation reported by a prompt type
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Survey id not present in the campaign
    #[error("Survey '{0}' not found")]
    SurveyNotFound(String),

    /// Prompt id not present in the survey
    #[error("Prompt '{prompt_id}' not found in survey '{survey_id}'")]
    PromptNotFound {
        survey_id: String,
        prompt_id: String,
    },

    /// The campaign is not accepting responses
    #[error("Campaign '{0}' is stopped")]
    CampaignStopped(String),

    /// A survey run was driven out of order
    #[error("Survey run error: {0}")]
    Run(String),

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Malformed condition syntax
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message} at position {position} (found '{token}')")]
pub struct ParseError {
    /// Byte offset of the offending token in the condition text
    pub position: usize,
    /// The offending token, or `<end>` at end of input
    pub token: String,
    pub message: String,
}

/// Semantic violations. Every variant names the prompt at fault.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A condition-value pair is not legal for the referenced prompt's type
    #[error("Illegal condition '{pair}' on prompt '{prompt_id}': {reason}")]
    IllegalCondition {
        prompt_id: String,
        pair: String,
        reason: String,
    },

    /// A raw value could not be validated for a prompt
    #[error("Invalid value for prompt '{prompt_id}': {reason}")]
    InvalidValue { prompt_id: String, reason: String },

    /// The prompt was skipped but is not skippable
    #[error("The prompt '{prompt_id}' was skipped, but it is not skippable")]
    NotSkippable { prompt_id: String },

    /// A repeatable-set prompt was answered without an iteration
    #[error("The prompt '{prompt_id}' is part of a repeatable set, but no iteration was given")]
    MissingIteration { prompt_id: String },

    #[error("The repeatable set iteration for prompt '{prompt_id}' is negative: {iteration}")]
    NegativeIteration { prompt_id: String, iteration: i64 },

    /// An iteration was given for a prompt outside any repeatable set
    #[error("The prompt '{prompt_id}' is not part of a repeatable set, but iteration {iteration} was given")]
    UnexpectedIteration { prompt_id: String, iteration: i64 },

    /// A condition references a prompt that does not precede it
    #[error("The condition of prompt '{prompt_id}' references '{referenced}', which does not precede it")]
    InvalidReference {
        prompt_id: String,
        referenced: String,
    },

    #[error("Duplicate prompt id '{prompt_id}'")]
    DuplicatePrompt { prompt_id: String },

    /// Prompt type properties are inconsistent
    #[error("Invalid properties for prompt '{prompt_id}': {reason}")]
    InvalidProperties { prompt_id: String, reason: String },
}

impl DomainError {
    /// The prompt the error is about
    pub fn prompt_id(&self) -> &str {
        match self {
            DomainError::IllegalCondition { prompt_id, .. }
            | DomainError::InvalidValue { prompt_id, .. }
            | DomainError::NotSkippable { prompt_id }
            | DomainError::MissingIteration { prompt_id }
            | DomainError::NegativeIteration { prompt_id, .. }
            | DomainError::UnexpectedIteration { prompt_id, .. }
            | DomainError::InvalidReference { prompt_id, .. }
            | DomainError::DuplicatePrompt { prompt_id }
            | DomainError::InvalidProperties { prompt_id, .. } => prompt_id,
        }
    }

    /// Create an illegal condition error
    pub fn illegal_condition(
        prompt_id: impl Into<String>,
        pair: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::IllegalCondition {
            prompt_id: prompt_id.into(),
            pair: pair.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(prompt_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            prompt_id: prompt_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid properties error
    pub fn invalid_properties(prompt_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProperties {
            prompt_id: prompt_id.into(),
            reason: reason.into(),
        }
    }
}

impl ParseError {
    pub fn new(position: usize, token: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            position,
            token: token.into(),
            message: message.into(),
        }
    }
}

impl CampaignError {
    /// Create a condition parse error for a prompt
    pub fn condition(prompt_id: impl Into<String>, source: ParseError) -> Self {
        Self::Condition {
            prompt_id: prompt_id.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a survey run error
    pub fn run(message: impl Into<String>) -> Self {
        Self::Run(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_names_prompt() {
        let err = DomainError::invalid_value("wake_time", "not a date");
        assert_eq!(err.prompt_id(), "wake_time");
        assert!(err.to_string().contains("wake_time"));

        let err = DomainError::NegativeIteration {
            prompt_id: "meal".to_string(),
            iteration: -1,
        };
        assert_eq!(err.prompt_id(), "meal");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(4, "==", "Expected a value");
        assert_eq!(err.to_string(), "Expected a value at position 4 (found '==')");
    }

    #[test]
    fn test_campaign_error_wraps_parse_error() {
        let err = CampaignError::condition("mood", ParseError::new(0, "<end>", "Empty condition"));
        let message = err.to_string();
        assert!(message.contains("mood"));
        assert!(message.contains("Empty condition"));
    }

    #[test]
    fn test_campaign_error_from_domain() {
        let err: CampaignError = DomainError::NotSkippable {
            prompt_id: "sleep".to_string(),
        }
        .into();
        assert!(matches!(err, CampaignError::Domain(_)));
    }
}
