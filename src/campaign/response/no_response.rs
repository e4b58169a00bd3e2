// SPDX-License-Identifier: MIT

//! Sentinel answers for prompts without a substantive response

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a prompt has no substantive answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoResponse {
    /// The user skipped the prompt. Only legal for skippable prompts.
    Skipped,
    /// The prompt's condition evaluated to false
    NotDisplayed,
    Hidden,
}

impl NoResponse {
    pub const ALL: [NoResponse; 3] = [
        NoResponse::Skipped,
        NoResponse::NotDisplayed,
        NoResponse::Hidden,
    ];

    /// The canonical name, e.g. `NOT_DISPLAYED`
    pub fn as_str(&self) -> &'static str {
        match self {
            NoResponse::Skipped => "SKIPPED",
            NoResponse::NotDisplayed => "NOT_DISPLAYED",
            NoResponse::Hidden => "HIDDEN",
        }
    }
}

impl fmt::Display for NoResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not the exact name of a [`NoResponse`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNoResponse(pub String);

impl fmt::Display for UnknownNoResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a no-response value", self.0)
    }
}

impl std::error::Error for UnknownNoResponse {}

impl FromStr for NoResponse {
    type Err = UnknownNoResponse;

    /// Names are matched exactly (case-sensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoResponse::ALL
            .into_iter()
            .find(|nr| nr.as_str() == s)
            .ok_or_else(|| UnknownNoResponse(s.to_string()))
    }
}
