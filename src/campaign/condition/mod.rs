// SPDX-License-Identifier: MIT

//! Display conditions for prompts
//!
//! This module provides parsing and evaluation of prompt conditions.
//! Conditions compare earlier prompts' responses with literals:
//! - `mood > 3`
//! - `drink == 'coffee'`
//! - `(sleep == SKIPPED or sleep < 6) and cups >= 2`

mod ast;
mod cache;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{CompareOp, ConditionValuePair, Expression, Literal};
pub use cache::ConditionCache;
pub use evaluator::{evaluate, ResponseLookup};
pub(crate) use lexer::is_identifier;
pub use parser::parse;
