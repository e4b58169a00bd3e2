//! Tokenizer for condition expressions

use super::ast::CompareOp;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Prompt id or bare word
    Ident(String),
    Number(f64),
    /// Quoted text, quotes removed
    Str(String),
    Op(CompareOp),
    And,
    Or,
    LParen,
    RParen,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source
    pub position: usize,
    /// Source text of the token
    pub text: String,
}

/// Split a condition into tokens, ending with `Eof`
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match c {
            '(' => {
                chars.next();
                TokenKind::LParen
            }
            ')' => {
                chars.next();
                TokenKind::RParen
            }
            '=' | '!' | '<' | '>' => {
                chars.next();
                let followed_by_eq = matches!(chars.peek(), Some(&(_, '=')));
                if followed_by_eq {
                    chars.next();
                }
                match (c, followed_by_eq) {
                    ('=', true) => TokenKind::Op(CompareOp::Eq),
                    ('!', true) => TokenKind::Op(CompareOp::NotEq),
                    ('<', true) => TokenKind::Op(CompareOp::Lte),
                    ('>', true) => TokenKind::Op(CompareOp::Gte),
                    ('<', false) => TokenKind::Op(CompareOp::Lt),
                    ('>', false) => TokenKind::Op(CompareOp::Gt),
                    _ => {
                        return Err(ParseError::new(
                            start,
                            c.to_string(),
                            "Unknown operator",
                        ))
                    }
                }
            }
            '\'' | '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == c {
                        closed = true;
                        break;
                    }
                    text.push(ch);
                }
                if !closed {
                    return Err(ParseError::new(
                        start,
                        &input[start..],
                        "Unterminated string",
                    ));
                }
                TokenKind::Str(text)
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let mut end = start;
                while let Some(&(i, ch)) = chars.peek() {
                    let sign = ch == '-' && i == start;
                    if ch.is_ascii_digit() || ch == '.' || sign {
                        end = i + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[start..end];
                let number = text
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite() && !text.ends_with('.'))
                    .ok_or_else(|| ParseError::new(start, text, "Invalid number"))?;
                TokenKind::Number(number)
            }
            c if is_ident_start(c) => {
                let mut end = start;
                while let Some(&(i, ch)) = chars.peek() {
                    if is_ident_continue(ch) {
                        end = i + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let word = &input[start..end];
                if word.eq_ignore_ascii_case("and") {
                    TokenKind::And
                } else if word.eq_ignore_ascii_case("or") {
                    TokenKind::Or
                } else {
                    TokenKind::Ident(word.to_string())
                }
            }
            other => {
                return Err(ParseError::new(
                    start,
                    other.to_string(),
                    "Unexpected character",
                ))
            }
        };

        let end = chars.peek().map(|&(i, _)| i).unwrap_or(input.len());
        tokens.push(Token {
            kind,
            position: start,
            text: input[start..end].to_string(),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: input.len(),
        text: "<end>".to_string(),
    });
    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `name` lexes as a single identifier, so conditions can refer to it
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => {}
        _ => return false,
    }
    chars.all(is_ident_continue)
        && !name.eq_ignore_ascii_case("and")
        && !name.eq_ignore_ascii_case("or")
}
