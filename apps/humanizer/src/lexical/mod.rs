//! Lexical Transformer — synonym substitution for adjectives and adverbs.
//!
//! Candidate choice uses a crude frequency proxy: a lemma that shows up in more
//! of the word's synsets beats one that shows up once. Ties go to whichever
//! candidate the lexicon lists first. This is not corpus frequency and must stay
//! that way so output is reproducible for a given lexicon file.

use crate::lexicon::{Degree, Lexicon};
use crate::tagging::{CoarsePos, Tag};
use crate::text::Token;

/// Returns the preferred synonym of `word`, or `word` itself when there is none.
///
/// Comparatives and superlatives the lexicon does not list are looked up by
/// their base adjective and the synonym is graded with "more"/"most".
pub fn replace_word(lexicon: &Lexicon, word: &str, pos: CoarsePos) -> String {
    if let Some(synonym) = best_synonym(lexicon, word, pos) {
        return synonym;
    }
    if pos == CoarsePos::Adjective {
        if let Some((base, degree)) = lexicon.adjective_base(word) {
            if let Some(synonym) = best_synonym(lexicon, &base, pos) {
                return match degree {
                    Degree::Comparative => format!("more {synonym}"),
                    Degree::Superlative => format!("most {synonym}"),
                };
            }
        }
    }
    word.to_string()
}

fn best_synonym(lexicon: &Lexicon, word: &str, pos: CoarsePos) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for synset in lexicon.synsets_for(word, pos.into()) {
        for lemma in &synset.lemmas {
            if lemma.eq_ignore_ascii_case(word) || lemma.trim().is_empty() {
                continue;
            }
            match counts.iter_mut().find(|(l, _)| *l == lemma.as_str()) {
                Some((_, n)) => *n += 1,
                None => counts.push((lemma.as_str(), 1)),
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &(lemma, n) in &counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((lemma, n));
        }
    }

    best.map(|(lemma, _)| lemma.replace('_', " "))
}

/// Carries the casing pattern of `original` over to `replacement`.
pub fn match_case(original: &str, replacement: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if letters.first().is_some_and(|c| c.is_uppercase()) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

/// Rewrites every adjective/adverb word token in place. Other tokens are untouched.
/// Returns how many tokens changed.
pub fn substitute_tokens(lexicon: &Lexicon, tokens: &mut [Token], tags: &[Tag]) -> usize {
    let mut replaced = 0;
    for (token, tag) in tokens.iter_mut().zip(tags) {
        if !token.is_word() {
            continue;
        }
        let Some(pos) = tag.coarse() else {
            continue;
        };
        let synonym = replace_word(lexicon, &token.text, pos);
        if synonym != token.text {
            token.text = match_case(&token.text, &synonym);
            replaced += 1;
        }
    }
    replaced
}
