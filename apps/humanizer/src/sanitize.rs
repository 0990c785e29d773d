//! Reassembler/Sanitizer — rebuilds text from tokens and cleans up after the rewrites.
//!
//! `finalize` is the last step of every `humanize` call:
//! clean_symbols → restore newlines → trim → repair_escapes.
//! After it runs the output contains no `\ X` sequence for a LaTeX special `X`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{restore_newlines, Token, NEWLINE_PLACEHOLDER};

/// Characters LaTeX requires to be escaped with a backslash.
pub const LATEX_SPECIALS: &[char] = &['#', '$', '%', '&', '_', '{', '}'];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static SPACE_AROUND_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r" ?({NEWLINE_PLACEHOLDER}) ?")).expect("valid regex")
});

static SPACE_BEFORE_CLOSING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ([.,;:!?)\]}])").expect("valid regex"));

static SPACE_AFTER_OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([(\[{]) ").expect("valid regex"));

static BROKEN_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\ ([#$%&_{}])").expect("valid regex"));

/// Joins tokens back into a sentence.
///
/// A single space goes before a token exactly when whitespace preceded it in
/// the source, so punctuation that hugged a word still hugs it.
pub fn reassemble(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        if token.space_before && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&token.text);
    }
    out
}

/// Whitespace normalisation applied once to the rejoined document. Idempotent.
pub fn clean_symbols(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    // Placeholders are consecutive only when the source had blank lines; loop until none touch a space.
    let mut glued = collapsed.into_owned();
    loop {
        let next = SPACE_AROUND_PLACEHOLDER.replace_all(&glued, "$1").into_owned();
        if next == glued {
            break;
        }
        glued = next;
    }
    let closed = SPACE_BEFORE_CLOSING.replace_all(&glued, "$1");
    SPACE_AFTER_OPENING.replace_all(&closed, "$1").into_owned()
}

/// Rewrites `\ #` (backslash, space, special) to `\#` for every LaTeX special.
pub fn repair_escapes(text: &str) -> String {
    BROKEN_ESCAPE.replace_all(text, r"\$1").into_owned()
}

pub fn finalize(text: &str) -> String {
    let cleaned = clean_symbols(text);
    let restored = restore_newlines(&cleaned);
    repair_escapes(restored.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{protect_newlines, tokenize};

    #[test]
    fn test_reassemble_reconstructs_sentence() {
        for sentence in [
            "The cat runs quickly.",
            "Hello, world (again).",
            "It's 40\\% of Q3's total!",
            "Use {braces} and $math$ here.",
        ] {
            assert_eq!(reassemble(&tokenize(sentence)), sentence);
        }
    }

    #[test]
    fn test_reassemble_drops_leading_space() {
        assert_eq!(reassemble(&tokenize("  indented text.")), "indented text.");
    }

    #[test]
    fn test_reassemble_multiword_substitution() {
        let mut tokens = tokenize("It was really good.");
        tokens[2].text = "in truth".to_string();
        assert_eq!(reassemble(&tokens), "It was in truth good.");
    }

    #[test]
    fn test_clean_symbols_collapses_and_hugs() {
        assert_eq!(clean_symbols("a   b\t c"), "a b c");
        assert_eq!(clean_symbols("word , next ."), "word, next.");
        assert_eq!(clean_symbols("see ( below ) now"), "see (below) now");
        assert_eq!(clean_symbols("it. It is"), "it. It is");
    }

    #[test]
    fn test_clean_symbols_glues_placeholders() {
        let p = NEWLINE_PLACEHOLDER;
        assert_eq!(clean_symbols(&format!("A. {p} B.")), format!("A.{p}B."));
        assert_eq!(clean_symbols(&format!("A. {p} {p} B.")), format!("A.{p}{p}B."));
    }

    #[test]
    fn test_clean_symbols_is_a_fixed_point() {
        for text in [
            "Simple single spaced text.",
            "Mixed , spacing ( here ) and   there .",
            "Costs rose 40\\% in Q3; margins fell.",
        ] {
            let once = clean_symbols(text);
            assert_eq!(clean_symbols(&once), once, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn test_repair_every_latex_special() {
        for special in LATEX_SPECIALS {
            let broken = format!("cost \\ {special} value");
            let fixed = format!("cost \\{special} value");
            assert_eq!(repair_escapes(&broken), fixed);
        }
    }

    #[test]
    fn test_repair_leaves_other_backslashes() {
        assert_eq!(repair_escapes(r"\ textbf"), r"\ textbf");
        assert_eq!(repair_escapes(r"\textbf{x}"), r"\textbf{x}");
        assert_eq!(repair_escapes(r"already \# fine"), r"already \# fine");
    }

    #[test]
    fn test_finalize_restores_newlines_and_trims() {
        let text = protect_newlines("  A. \nB.  ");
        assert_eq!(finalize(&text), "A.\nB.");
    }

    #[test]
    fn test_finalize_repairs_escapes() {
        assert_eq!(finalize("Grew revenue 30\\ % and \\ & more"), "Grew revenue 30\\% and \\& more");
    }
}
