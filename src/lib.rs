// SPDX-License-Identifier: MIT

//! Survey campaigns with conditional prompts
//!
//! Prompts carry display conditions such as `mood <= 2 or mood == SKIPPED`
//! that are parsed and validated when a campaign is loaded and evaluated
//! against the responses collected so far while a survey is run.

pub mod campaign;
pub mod error;
