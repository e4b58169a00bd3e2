// SPDX-License-Identifier: MIT

//! Prompts and the prompt-type contract
//!
//! Every prompt type implements [`PromptType`]:
//! - `validate_condition_value_pair` - may a condition compare this prompt's
//!   response with the given literal?
//! - `validate_value` - normalize a raw answer into a [`ResponseValue`]
//! - `create_response` - validate and bind the answer to its prompt
//!
//! The set of types is closed: [`PromptKind`] has one variant per type and
//! dispatches to it.

mod number;
mod schema;
mod text;
mod timestamp;

pub use number::NumberPrompt;
pub use schema::{PrimitiveType, ResponseSchema, SchemaField, JSON_KEY_PROMPT_ID, JSON_KEY_RESPONSE};
pub use text::TextPrompt;
pub use timestamp::{parse_timestamp, TimestampPrompt};

use std::sync::Arc;

use crate::campaign::condition::{evaluate, ConditionValuePair, Expression, ResponseLookup};
use crate::campaign::response::{NoResponse, PromptResponse, RawValue, ResponseValue};
use crate::error::DomainError;

/// Behavior shared by every prompt type
pub trait PromptType {
    /// Check a pair from some condition that compares against `prompt`.
    /// Runs once per pair when the campaign is loaded.
    fn validate_condition_value_pair(
        &self,
        prompt: &Prompt,
        pair: &ConditionValuePair,
    ) -> Result<(), DomainError>;

    /// Normalize a raw answer. Validating an already normalized value
    /// returns it unchanged.
    fn validate_value(&self, prompt: &Prompt, value: RawValue)
        -> Result<ResponseValue, DomainError>;

    /// Validate `value` and wrap it in a response to `prompt`
    fn create_response(
        &self,
        prompt: &Arc<Prompt>,
        repeatable_set_iteration: Option<i64>,
        value: RawValue,
    ) -> Result<PromptResponse, DomainError> {
        let value = self.validate_value(prompt, value)?;
        PromptResponse::new(Arc::clone(prompt), repeatable_set_iteration, value)
    }
}

/// The type of a prompt together with its type-specific configuration
#[derive(Debug, Clone, PartialEq)]
pub enum PromptKind {
    Timestamp(TimestampPrompt),
    Number(NumberPrompt),
    Text(TextPrompt),
}

impl PromptKind {
    /// The type tag used in campaign definitions
    pub fn type_name(&self) -> &'static str {
        match self {
            PromptKind::Timestamp(_) => "timestamp",
            PromptKind::Number(_) => "number",
            PromptKind::Text(_) => "text",
        }
    }

    /// Primitive type of a normalized value of this kind
    pub fn value_type(&self) -> PrimitiveType {
        match self {
            PromptKind::Timestamp(_) => PrimitiveType::String,
            PromptKind::Number(_) => PrimitiveType::Number,
            PromptKind::Text(_) => PrimitiveType::String,
        }
    }

    /// Check that the type configuration is consistent
    pub fn check_properties(&self, prompt_id: &str) -> Result<(), DomainError> {
        match self {
            PromptKind::Timestamp(_) => Ok(()),
            PromptKind::Number(number) => number.check_properties(prompt_id),
            PromptKind::Text(text) => text.check_properties(prompt_id),
        }
    }
}

impl PromptType for PromptKind {
    fn validate_condition_value_pair(
        &self,
        prompt: &Prompt,
        pair: &ConditionValuePair,
    ) -> Result<(), DomainError> {
        match self {
            PromptKind::Timestamp(t) => t.validate_condition_value_pair(prompt, pair),
            PromptKind::Number(n) => n.validate_condition_value_pair(prompt, pair),
            PromptKind::Text(t) => t.validate_condition_value_pair(prompt, pair),
        }
    }

    fn validate_value(
        &self,
        prompt: &Prompt,
        value: RawValue,
    ) -> Result<ResponseValue, DomainError> {
        match self {
            PromptKind::Timestamp(t) => t.validate_value(prompt, value),
            PromptKind::Number(n) => n.validate_value(prompt, value),
            PromptKind::Text(t) => t.validate_value(prompt, value),
        }
    }

    fn create_response(
        &self,
        prompt: &Arc<Prompt>,
        repeatable_set_iteration: Option<i64>,
        value: RawValue,
    ) -> Result<PromptResponse, DomainError> {
        match self {
            PromptKind::Timestamp(t) => t.create_response(prompt, repeatable_set_iteration, value),
            PromptKind::Number(n) => n.create_response(prompt, repeatable_set_iteration, value),
            PromptKind::Text(t) => t.create_response(prompt, repeatable_set_iteration, value),
        }
    }
}

/// A parsed, validated display condition and the text it came from
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCondition {
    text: String,
    expression: Arc<Expression>,
}

impl DisplayCondition {
    pub fn new(text: impl Into<String>, expression: Arc<Expression>) -> Self {
        Self {
            text: text.into(),
            expression,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

/// A single survey question
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    id: String,
    condition: Option<DisplayCondition>,
    unit: Option<String>,
    text: String,
    explanation_text: Option<String>,
    skippable: bool,
    skip_label: Option<String>,
    display_label: Option<String>,
    kind: PromptKind,
    index: usize,
    repeatable_set: Option<String>,
}

impl Prompt {
    /// Create a prompt with no condition that cannot be skipped
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: PromptKind) -> Self {
        Self {
            id: id.into(),
            condition: None,
            unit: None,
            text: text.into(),
            explanation_text: None,
            skippable: false,
            skip_label: None,
            display_label: None,
            kind,
            index: 0,
            repeatable_set: None,
        }
    }

    pub fn with_skippable(mut self, skippable: bool) -> Self {
        self.skippable = skippable;
        self
    }

    /// Make the prompt skippable
    pub fn with_skip_label(mut self, skip_label: impl Into<String>) -> Self {
        self.skippable = true;
        self.skip_label = Some(skip_label.into());
        self
    }

    pub fn with_condition(mut self, condition: DisplayCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_explanation_text(mut self, explanation_text: impl Into<String>) -> Self {
        self.explanation_text = Some(explanation_text.into());
        self
    }

    pub fn with_display_label(mut self, display_label: impl Into<String>) -> Self {
        self.display_label = Some(display_label.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Place the prompt inside the given repeatable set
    pub fn in_repeatable_set(mut self, set_id: impl Into<String>) -> Self {
        self.repeatable_set = Some(set_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn condition(&self) -> Option<&DisplayCondition> {
        self.condition.as_ref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn explanation_text(&self) -> Option<&str> {
        self.explanation_text.as_deref()
    }

    pub fn is_skippable(&self) -> bool {
        self.skippable
    }

    pub fn skip_label(&self) -> Option<&str> {
        self.skip_label.as_deref()
    }

    pub fn display_label(&self) -> Option<&str> {
        self.display_label.as_deref()
    }

    pub fn kind(&self) -> &PromptKind {
        &self.kind
    }

    /// Position within the containing survey or repeatable set
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the repeatable set this prompt belongs to
    pub fn repeatable_set(&self) -> Option<&str> {
        self.repeatable_set.as_deref()
    }

    /// Whether the prompt should be shown given the responses so far.
    /// Prompts without a condition are always shown.
    pub fn is_shown<L: ResponseLookup + ?Sized>(&self, responses: &L) -> bool {
        match &self.condition {
            None => true,
            Some(condition) => evaluate(condition.expression(), responses),
        }
    }

    /// Check a condition pair that compares against this prompt
    pub fn validate_condition_value_pair(
        &self,
        pair: &ConditionValuePair,
    ) -> Result<(), DomainError> {
        self.kind.validate_condition_value_pair(self, pair)
    }

    pub fn validate_value(&self, value: impl Into<RawValue>) -> Result<ResponseValue, DomainError> {
        self.kind.validate_value(self, value.into())
    }

    pub fn create_response(
        self: &Arc<Self>,
        repeatable_set_iteration: Option<i64>,
        value: impl Into<RawValue>,
    ) -> Result<PromptResponse, DomainError> {
        self.kind
            .create_response(self, repeatable_set_iteration, value.into())
    }

    /// Shape of a serialized response to this prompt
    pub fn response_schema(&self) -> ResponseSchema {
        ResponseSchema::for_value(self.kind.value_type())
    }
}

/// No-response answers: skipping requires a skippable prompt
pub(crate) fn validate_no_response(
    prompt: &Prompt,
    no_response: NoResponse,
) -> Result<ResponseValue, DomainError> {
    if no_response == NoResponse::Skipped && !prompt.is_skippable() {
        return Err(DomainError::NotSkippable {
            prompt_id: prompt.id().to_string(),
        });
    }
    Ok(ResponseValue::NoResponse(no_response))
}

/// No-response literals only support `==` and `!=`
pub(crate) fn validate_no_response_pair(
    prompt: &Prompt,
    pair: &ConditionValuePair,
) -> Result<(), DomainError> {
    if pair.op.is_ordering() {
        return Err(DomainError::illegal_condition(
            prompt.id(),
            pair,
            format!(
                "no-response values can only be compared with '==' or '!=', not '{}'",
                pair.op
            ),
        ));
    }
    Ok(())
}
