//! Contraction expansion. Applied to every sentence regardless of configuration.
//!
//! Expansions contain no apostrophes, so running this twice is the same as running it once.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

const CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "is not"),
    ("aren't", "are not"),
    ("can't", "cannot"),
    ("couldn't", "could not"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("hadn't", "had not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("isn't", "is not"),
    ("mightn't", "might not"),
    ("mustn't", "must not"),
    ("shan't", "shall not"),
    ("shouldn't", "should not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("i'm", "I am"),
    ("i've", "I have"),
    ("i'll", "I will"),
    ("i'd", "I would"),
    ("you're", "you are"),
    ("you've", "you have"),
    ("you'll", "you will"),
    ("you'd", "you would"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("we'll", "we will"),
    ("we'd", "we would"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("they'll", "they will"),
    ("they'd", "they would"),
    ("he's", "he is"),
    ("he'll", "he will"),
    ("he'd", "he would"),
    ("she's", "she is"),
    ("she'll", "she will"),
    ("she'd", "she would"),
    ("it's", "it is"),
    ("it'll", "it will"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("here's", "here is"),
    ("what's", "what is"),
    ("who's", "who is"),
    ("where's", "where is"),
    ("how's", "how is"),
    ("let's", "let us"),
];

static EXPANSIONS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CONTRACTIONS.iter().copied().collect());

/// Alternation over every table key, longest first, accepting straight or curly apostrophes.
static CONTRACTION_RE: Lazy<Regex> = Lazy::new(|| {
    let mut keys: Vec<&str> = CONTRACTIONS.iter().map(|(k, _)| *k).collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k).replace('\'', "['’]"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid regex")
});

pub fn expand_contractions(text: &str) -> String {
    CONTRACTION_RE
        .replace_all(text, |caps: &regex::Captures| {
            let matched = &caps[0];
            let key = matched.to_lowercase().replace('’', "'");
            match EXPANSIONS.get(key.as_str()) {
                Some(expansion) => restore_case(matched, expansion),
                None => matched.to_string(),
            }
        })
        .into_owned()
}

fn restore_case(matched: &str, expansion: &str) -> String {
    let letters: Vec<char> = matched.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return expansion.to_uppercase();
    }
    if letters.first().is_some_and(|c| c.is_uppercase()) {
        let mut chars = expansion.chars();
        if let Some(first) = chars.next() {
            return first.to_uppercase().chain(chars).collect();
        }
    }
    expansion.to_string()
}
