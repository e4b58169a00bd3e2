//! Condition expression parser
//!
//! Parses expressions like:
//! - `mood > 3`
//! - `drink == 'coffee' and cups >= 2`
//! - `(sleep == SKIPPED or sleep < 6) and caffeine != NOT_DISPLAYED`
//!
//! `and` binds tighter than `or`. A run of the same connective becomes one
//! flat `And`/`Or` node holding its operands left to right, so the tree only
//! grows deeper through parentheses.

use super::ast::{ConditionValuePair, Expression, Literal};
use super::lexer::{tokenize, Token, TokenKind};
use crate::campaign::response::NoResponse;
use crate::error::ParseError;

/// Parenthesis nesting limit
const MAX_DEPTH: usize = 64;

/// Parse a condition expression string into an AST
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::new(0, "<end>", "Empty condition"));
    }

    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;
    parser.expect_end()?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        // `tokenize` always ends with Eof, and Eof is never consumed
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: &str) -> ParseError {
        let token = self.current();
        ParseError::new(token.position, token.text.clone(), message)
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut operands = vec![self.parse_and()?];
        while self.current().kind == TokenKind::Or {
            self.advance();
            operands.push(self.parse_and()?);
        }
        Ok(connect(operands, Expression::Or))
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut operands = vec![self.parse_primary()?];
        while self.current().kind == TokenKind::And {
            self.advance();
            operands.push(self.parse_primary()?);
        }
        Ok(connect(operands, Expression::And))
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        if self.current().kind != TokenKind::LParen {
            return self.parse_comparison();
        }

        if self.depth >= MAX_DEPTH {
            return Err(self.error("Conditions are nested too deeply"));
        }
        self.advance();
        self.depth += 1;
        let inner = self.parse_or()?;
        self.depth -= 1;

        match self.current().kind {
            TokenKind::RParen => {
                self.advance();
                Ok(inner)
            }
            _ => Err(self.error("Expected ')'")),
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let prompt_id = match &self.current().kind {
            TokenKind::Ident(id) => id.clone(),
            _ => return Err(self.error("Expected a prompt id")),
        };
        self.advance();

        let op = match self.current().kind {
            TokenKind::Op(op) => op,
            _ => return Err(self.error("Expected a comparison operator")),
        };
        self.advance();

        let value = self.parse_literal()?;
        Ok(Expression::Compare(ConditionValuePair {
            prompt_id,
            op,
            value,
        }))
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let literal = match &self.current().kind {
            TokenKind::Number(n) => Literal::Number(*n),
            TokenKind::Str(s) => Literal::Text(s.clone()),
            TokenKind::Ident(word) => match word.parse::<NoResponse>() {
                Ok(nr) => Literal::NoResponse(nr),
                Err(_) => Literal::Text(word.clone()),
            },
            _ => return Err(self.error("Expected a value")),
        };
        self.advance();
        Ok(literal)
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.current().kind {
            TokenKind::Eof => Ok(()),
            TokenKind::RParen => Err(self.error("Unbalanced ')'")),
            _ => Err(self.error("Expected 'and', 'or' or end of condition")),
        }
    }
}

fn connect(mut operands: Vec<Expression>, build: fn(Vec<Expression>) -> Expression) -> Expression {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        build(operands)
    }
}
