//! Word/symbol tokenizer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words are ASCII alphanumeric runs; everything else that is not whitespace is a symbol run.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+|[^A-Za-z0-9_\s]+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// Whether whitespace separated this token from the previous one in the source.
    pub space_before: bool,
}

impl Token {
    pub fn word(text: &str, space_before: bool) -> Self {
        Self {
            text: text.to_string(),
            kind: TokenKind::Word,
            space_before,
        }
    }

    pub fn symbol(text: &str, space_before: bool) -> Self {
        Self {
            text: text.to_string(),
            kind: TokenKind::Symbol,
            space_before,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

pub fn tokenize(sentence: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for m in TOKEN_RE.find_iter(sentence) {
        let space_before = m.start() > cursor;
        let text = m.as_str();
        let is_word = text
            .chars()
            .next()
            .map(|c| c.is_ascii_alphanumeric() || c == '_')
            .unwrap_or(false);
        tokens.push(if is_word {
            Token::word(text, space_before)
        } else {
            Token::symbol(text, space_before)
        });
        cursor = m.end();
    }

    tokens
}
