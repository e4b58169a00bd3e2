// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for display conditions

use std::cmp::Ordering;
use std::fmt;

use crate::campaign::response::NoResponse;

/// A display condition
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A single comparison against another prompt's response
    Compare(ConditionValuePair),
    /// Logical AND over two or more operands, in source order
    And(Vec<Expression>),
    /// Logical OR over two or more operands, in source order
    Or(Vec<Expression>),
}

/// One comparison: `prompt_id op value`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionValuePair {
    /// The prompt whose response is compared
    pub prompt_id: String,
    pub op: CompareOp,
    pub value: Literal,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// ==
    Eq,
    /// !=
    NotEq,
    /// >
    Gt,
    /// >=
    Gte,
    /// <
    Lt,
    /// <=
    Lte,
}

/// Literal values in conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    NoResponse(NoResponse),
}

impl Expression {
    /// All comparisons in source order
    pub fn pairs(&self) -> Vec<&ConditionValuePair> {
        let mut pairs = Vec::new();
        collect_pairs(self, &mut pairs);
        pairs
    }

    /// Ids of the prompts this condition reads, in source order, without repeats
    pub fn referenced_prompts(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for pair in self.pairs() {
            if !ids.contains(&pair.prompt_id.as_str()) {
                ids.push(&pair.prompt_id);
            }
        }
        ids
    }
}

fn collect_pairs<'a>(expr: &'a Expression, out: &mut Vec<&'a ConditionValuePair>) {
    match expr {
        Expression::Compare(pair) => out.push(pair),
        Expression::And(operands) | Expression::Or(operands) => {
            for operand in operands {
                collect_pairs(operand, out);
            }
        }
    }
}

impl CompareOp {
    /// `<`, `>`, `<=`, `>=`
    pub fn is_ordering(&self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::NotEq)
    }

    /// Whether `left.cmp(right) == ordering` satisfies this operator
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Text(s) => write!(f, "'{}'", s),
            Literal::NoResponse(nr) => write!(f, "{}", nr),
        }
    }
}

impl fmt::Display for ConditionValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.prompt_id, self.op, self.value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Compare(pair) => write!(f, "{}", pair),
            Expression::And(operands) => write_joined(f, operands, " and "),
            Expression::Or(operands) => write_joined(f, operands, " or "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, operands: &[Expression], connective: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", connective)?;
        }
        write!(f, "{}", operand)?;
    }
    write!(f, ")")
}
