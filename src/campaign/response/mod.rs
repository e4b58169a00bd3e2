// SPDX-License-Identifier: MIT

//! Response values and prompt responses
//!
//! - `NoResponse` - sentinel answers (skipped, not displayed, hidden)
//! - `RawValue` - an answer as submitted
//! - `ResponseValue` - the normalized answer
//! - `PromptResponse` - a normalized answer bound to its prompt

mod no_response;
mod prompt_response;
mod value;

pub use no_response::{NoResponse, UnknownNoResponse};
pub use prompt_response::PromptResponse;
pub use value::{RawValue, ResponseValue};
