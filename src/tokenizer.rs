//! Omnibox tokenizer
//!
//! Splits raw omnibox text into words, quoted spans, flags and connective
//! operators. Permissive: characters that fit no token class are skipped.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Connective words emitted as operators instead of words
pub const OPERATORS: [&str; 6] = ["vs", "with", "on", "in", "to", "from"];

lazy_static! {
    static ref TOKEN_RE: Regex =
        Regex::new(r#""([^"]*)"|'([^']*)'|(--?[^\s"']*)|([\w./*]+)"#).unwrap();
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Word,
    Quoted,
    Flag,
    Operator,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Word => "word",
            TokenKind::Quoted => "quoted",
            TokenKind::Flag => "flag",
            TokenKind::Operator => "operator",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
    /// Index among emitted tokens, not a character offset
    pub position: usize,
}

impl Token {
    pub fn is_flag(&self) -> bool {
        self.kind == TokenKind::Flag
    }
}

/// Tokenize omnibox input. Never fails; empty input yields no tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let normalized = input.trim().to_lowercase();
    let mut tokens = Vec::new();

    for caps in TOKEN_RE.captures_iter(&normalized) {
        let (kind, value) = if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            (TokenKind::Quoted, m.as_str())
        } else if let Some(m) = caps.get(3) {
            (TokenKind::Flag, m.as_str())
        } else if let Some(m) = caps.get(4) {
            let kind = if OPERATORS.contains(&m.as_str()) {
                TokenKind::Operator
            } else {
                TokenKind::Word
            };
            (kind, m.as_str())
        } else {
            continue;
        };

        tokens.push(Token {
            kind,
            value: value.to_string(),
            position: tokens.len(),
        });
    }

    tokens
}

/// Join token values with single spaces
pub fn joined_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
