//! Academic transition insertion.

use rand::Rng;

use crate::syntactic::roll;

pub const ACADEMIC_TRANSITIONS: &[&str] = &[
    "Furthermore,",
    "Moreover,",
    "In addition,",
    "Additionally,",
    "Consequently,",
    "Therefore,",
    "Nevertheless,",
    "Hence,",
];

/// True when the sentence already opens with one of the pool's phrases (comma optional).
pub fn starts_with_transition(sentence: &str) -> bool {
    let lower = sentence.trim_start().to_lowercase();
    ACADEMIC_TRANSITIONS.iter().any(|phrase| {
        let stem = phrase.trim_end_matches(',').to_lowercase();
        lower.starts_with(&stem)
            && !lower[stem.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric())
    })
}

/// Prefixes `sentence` with `phrase`, lowercasing the old first letter where that keeps it grammatical.
///
/// `I` and all-caps words (acronyms) keep their case.
pub fn insert_transition(sentence: &str, phrase: &str) -> String {
    let body = sentence.trim_start();
    if body.is_empty() {
        return sentence.to_string();
    }
    format!("{phrase} {}", decapitalize(body))
}

fn decapitalize(body: &str) -> String {
    let first_word: String = body.chars().take_while(|c| c.is_alphabetic()).collect();
    let keep = first_word == "I"
        || (first_word.chars().count() > 1 && first_word.chars().all(|c| c.is_uppercase()));
    let mut chars = body.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() && !keep => first.to_lowercase().chain(chars).collect(),
        _ => body.to_string(),
    }
}

pub fn maybe_insert_transition<R: Rng>(
    sentence: &str,
    enabled: bool,
    probability: f64,
    rng: &mut R,
) -> String {
    if !enabled || sentence.trim().is_empty() || starts_with_transition(sentence) {
        return sentence.to_string();
    }
    if !roll(rng, probability) {
        return sentence.to_string();
    }
    let phrase = ACADEMIC_TRANSITIONS[rng.random_range(0..ACADEMIC_TRANSITIONS.len())];
    insert_transition(sentence, phrase)
}
