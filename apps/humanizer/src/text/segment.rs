//! Sentence segmentation with newline protection.
//!
//! Newlines are swapped for a private-use codepoint before matching so that the
//! sentence pattern treats them as ordinary symbol characters. They are swapped
//! back once the whole document has been rewritten and cleaned.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Stands in for `\n` while the document is being transformed.
pub const NEWLINE_PLACEHOLDER: char = '\u{E000}';

/// A run of non-terminators closed by `.`, `!` or `?`, or a free-floating symbol run.
static SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+|[^\w\s]+").expect("valid regex"));

/// One segmentation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    /// False for trailing text the sentence pattern did not cover (no final terminator).
    pub terminated: bool,
}

impl Sentence {
    fn terminated(text: &str) -> Self {
        Self {
            text: text.to_string(),
            terminated: true,
        }
    }
}

pub fn protect_newlines(text: &str) -> String {
    text.replace('\n', &NEWLINE_PLACEHOLDER.to_string())
}

pub fn restore_newlines(text: &str) -> String {
    text.replace(NEWLINE_PLACEHOLDER, "\n")
}

/// Splits protected text into sentences.
///
/// Characters outside every match are kept as unterminated sentences rather than
/// dropped; in practice this is a final clause or bullet without a period.
pub fn segment(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut cursor = 0;

    for m in SENTENCE_RE.find_iter(text) {
        if m.start() > cursor {
            push_uncovered(&mut sentences, &text[cursor..m.start()]);
        }
        sentences.push(Sentence::terminated(m.as_str()));
        cursor = m.end();
    }

    if cursor < text.len() {
        push_uncovered(&mut sentences, &text[cursor..]);
    }

    sentences
}

fn push_uncovered(sentences: &mut Vec<Sentence>, span: &str) {
    if !span.trim().is_empty() {
        debug!(len = span.len(), "Keeping text not covered by the sentence pattern");
    }
    sentences.push(Sentence {
        text: span.to_string(),
        terminated: false,
    });
}

/// Separates leading whitespace and newline placeholders from the sentence body.
pub fn split_leading(sentence: &str) -> (&str, &str) {
    let body_start = sentence
        .char_indices()
        .find(|&(_, c)| !(c.is_whitespace() || c == NEWLINE_PLACEHOLDER))
        .map(|(i, _)| i)
        .unwrap_or(sentence.len());
    sentence.split_at(body_start)
}
