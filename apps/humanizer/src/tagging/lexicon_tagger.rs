//! Rule tagger: closed-class lists, lexicon lookup, then suffix heuristics.
//!
//! Used on its own when no dictionary is wanted, and as the context source for
//! `DictionaryTagger`.
//!
//! Rule order per word token:
//! 1. closed-class lists (determiners, pronouns, prepositions, conjunctions, auxiliaries)
//! 2. verb-form table, only right after a subject-like word
//! 3. lexicon part of speech (first synset listing the word)
//! 4. comparative/superlative of a known adjective (`-er`, `-est`)
//! 5. suffixes: `-ly` adverb, adjective endings, `-ed`/`-ing` verbs
//! 6. capitalised mid-sentence word is a proper noun, anything else a noun

use std::sync::Arc;

use crate::errors::HumanizerError;
use crate::lexicon::{Degree, Lexicon, PartOfSpeech};
use crate::tagging::{PosTagger, Tag};
use crate::text::tokenize;

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "our", "your", "his", "her",
    "its", "their", "some", "any", "every", "each", "no", "all", "both",
];

const PRONOUNS: &[&str] = &[
    "i", "we", "you", "he", "she", "it", "they", "me", "us", "him", "them", "myself",
    "ourselves", "itself", "themselves", "who", "what", "which", "everything", "something",
    "nothing", "anything", "everyone", "someone",
];

const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "without", "to", "from", "into", "onto",
    "over", "under", "about", "through", "across", "after", "before", "during", "between",
    "against", "among", "since", "until", "within", "like", "than", "per", "via",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "yet", "because", "although", "though", "while", "if",
    "unless", "whereas", "which", "that",
];

const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had", "do",
    "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];

const ADVERB_WORDS: &[&str] = &["not", "never", "very", "too", "also", "just", "still", "then"];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "al", "ic", "less"];

#[derive(Clone)]
pub struct LexiconTagger {
    lexicon: Arc<Lexicon>,
}

impl LexiconTagger {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn tag_word(&self, word: &str, lower: &str, index: usize, prev: Option<Tag>) -> (Tag, Evidence) {
        use Evidence::{Guessed, Listed};

        if lower.chars().all(|c| c.is_ascii_digit()) {
            return (Tag::Number, Listed);
        }
        if DETERMINERS.contains(&lower) && !(lower == "that" && prev == Some(Tag::Verb)) {
            return (Tag::Determiner, Listed);
        }
        if PRONOUNS.contains(&lower) {
            return (Tag::Pronoun, Listed);
        }
        if AUXILIARIES.contains(&lower) {
            return (Tag::Verb, Listed);
        }
        if PREPOSITIONS.contains(&lower) {
            return (Tag::Preposition, Listed);
        }
        if CONJUNCTIONS.contains(&lower) {
            return (Tag::Conjunction, Listed);
        }
        if ADVERB_WORDS.contains(&lower) {
            return (Tag::Adverb, Listed);
        }

        let after_subject = matches!(
            prev,
            Some(Tag::Pronoun) | Some(Tag::Noun) | Some(Tag::ProperNoun) | Some(Tag::Adverb)
        );
        if after_subject && self.lexicon.verb_form(lower).is_some() {
            return (Tag::Verb, Listed);
        }

        match self.lexicon.primary_pos(lower) {
            Some(PartOfSpeech::Adjective) => return (Tag::Adjective, Listed),
            Some(PartOfSpeech::Adverb) => return (Tag::Adverb, Listed),
            Some(PartOfSpeech::Verb) => return (Tag::Verb, Listed),
            Some(PartOfSpeech::Noun) => return (Tag::Noun, Listed),
            None => {}
        }

        match self.lexicon.adjective_base(lower) {
            Some((_, Degree::Superlative)) => return (Tag::AdjectiveSuperlative, Listed),
            Some((_, Degree::Comparative)) => return (Tag::AdjectiveComparative, Listed),
            None => {}
        }

        if lower.len() > 4 && lower.ends_with("ly") {
            return (Tag::Adverb, Guessed);
        }
        if lower.len() > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return (Tag::Adjective, Guessed);
        }
        if lower.len() > 4 && (lower.ends_with("ed") || lower.ends_with("ing")) {
            return (Tag::Verb, Guessed);
        }
        if self.lexicon.verb_form(lower).is_some() {
            return (Tag::Verb, Listed);
        }

        let capitalised = word.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        if capitalised && index > 0 {
            (Tag::ProperNoun, Guessed)
        } else {
            (Tag::Noun, Guessed)
        }
    }

    /// Tags every token and records whether the tag came from a word list or
    /// the lexicon (`Listed`) or only from spelling (`Guessed`).
    pub(crate) fn tag_with_evidence(&self, sentence: &str) -> Vec<(String, Tag, Evidence)> {
        let mut tagged: Vec<(String, Tag, Evidence)> = Vec::new();
        let mut word_index = 0;

        for token in tokenize(sentence) {
            if !token.is_word() {
                tagged.push((token.text, Tag::Punctuation, Evidence::Listed));
                continue;
            }
            let lower = token.text.to_lowercase();
            let prev = tagged
                .iter()
                .rev()
                .find(|(_, t, _)| *t != Tag::Punctuation)
                .map(|(_, t, _)| *t);
            let (tag, evidence) = self.tag_word(&token.text, &lower, word_index, prev);
            tagged.push((token.text, tag, evidence));
            word_index += 1;
        }

        tagged
    }
}

/// How a rule tag was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Evidence {
    Listed,
    Guessed,
}

impl PosTagger for LexiconTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError> {
        Ok(self
            .tag_with_evidence(sentence)
            .into_iter()
            .map(|(text, tag, _)| (text, tag))
            .collect())
    }
}
