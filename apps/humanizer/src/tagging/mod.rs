//! POS Tagger adapter — the narrow seam between the pipeline and whatever tagger is in use.
//!
//! The pipeline only needs to know which word tokens are adjectives or adverbs
//! (for synonym substitution) and a rough noun/verb/pronoun picture (for the
//! passive heuristic). `DictionaryTagger` is the default; `LexiconTagger`
//! runs without the dictionary.

pub mod dictionary_tagger;
pub mod lexicon_tagger;

use serde::{Deserialize, Serialize};

use crate::errors::HumanizerError;
use crate::lexicon::PartOfSpeech;

pub use dictionary_tagger::DictionaryTagger;
pub use lexicon_tagger::LexiconTagger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// JJ
    Adjective,
    /// JJR
    AdjectiveComparative,
    /// JJS
    AdjectiveSuperlative,
    /// RB
    Adverb,
    /// RBR
    AdverbComparative,
    /// RBS
    AdverbSuperlative,
    Noun,
    ProperNoun,
    Pronoun,
    Verb,
    Determiner,
    Preposition,
    Conjunction,
    Number,
    Punctuation,
    Other,
}

/// The two word classes eligible for synonym substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoarsePos {
    Adjective,
    Adverb,
}

impl From<CoarsePos> for PartOfSpeech {
    fn from(pos: CoarsePos) -> Self {
        match pos {
            CoarsePos::Adjective => PartOfSpeech::Adjective,
            CoarsePos::Adverb => PartOfSpeech::Adverb,
        }
    }
}

impl Tag {
    pub fn coarse(self) -> Option<CoarsePos> {
        match self {
            Tag::Adjective | Tag::AdjectiveComparative | Tag::AdjectiveSuperlative => {
                Some(CoarsePos::Adjective)
            }
            Tag::Adverb | Tag::AdverbComparative | Tag::AdverbSuperlative => {
                Some(CoarsePos::Adverb)
            }
            _ => None,
        }
    }
}

/// Assigns one tag per token of a sentence.
///
/// Implementations must tokenize with `text::tokenize` semantics; the pipeline
/// rejects output that does not line up token-for-token.
pub trait PosTagger: Send + Sync {
    fn tag(&self, sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError>;
}
