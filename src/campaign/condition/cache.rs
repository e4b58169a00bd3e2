// SPDX-License-Identifier: MIT

//! Parsed-condition cache
//!
//! Each distinct condition string is parsed at most once. The map lock is
//! only held long enough to fetch or insert a per-key cell; the parse runs
//! inside that cell, so threads parsing different conditions never wait on
//! each other.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::ast::Expression;
use super::parser::parse;
use crate::error::ParseError;

type ParseResult = Result<Arc<Expression>, ParseError>;

/// Type alias for the cell map to reduce complexity
type CellMap = HashMap<String, Arc<OnceCell<ParseResult>>>;

/// Shared cache of parsed conditions, keyed by condition text
#[derive(Clone, Default)]
pub struct ConditionCache {
    cells: Arc<RwLock<CellMap>>,
}

impl ConditionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `condition`, or return the result of the earlier parse.
    ///
    /// Failed parses are cached as well.
    pub fn get_or_parse(&self, condition: &str) -> ParseResult {
        let cell = self.cell(condition);
        cell.get_or_init(|| {
            log::debug!("Parsing condition: {}", condition);
            parse(condition).map(Arc::new)
        })
        .clone()
    }

    /// Number of distinct conditions seen
    pub fn len(&self) -> usize {
        self.cells.read().map(|cells| cells.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, condition: &str) -> Arc<OnceCell<ParseResult>> {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map itself is still consistent.
        {
            let cells = self
                .cells
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(cell) = cells.get(condition) {
                return cell.clone();
            }
        }

        let mut cells = self
            .cells
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells
            .entry(condition.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}

impl std::fmt::Debug for ConditionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionCache")
            .field("conditions", &self.len())
            .finish()
    }
}
