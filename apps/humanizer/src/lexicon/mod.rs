//! Lexical database — WordNet-style synsets plus a verb-form table.
//!
//! Loaded once (bundled JSON, a JSON file, or an Open English WordNet LMF
//! release), indexed, then shared read-only
//! behind an `Arc`. Synset order and lemma order are preserved from the file;
//! synonym tie-breaking relies on that order.

pub mod wordnet;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::HumanizerError;

const BUNDLED_LEXICON: &str = include_str!("../../resources/lexicon.json");

/// Part of speech as recorded in the lexicon file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

/// A set of interchangeable lemmas. Multiword lemmas join words with `_`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synset {
    pub pos: PartOfSpeech,
    pub lemmas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbForms {
    pub base: String,
    pub third_person: String,
    pub past: String,
    pub participle: String,
}

/// Grade of an inflected adjective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degree {
    Comparative,
    Superlative,
}

/// Which finite form of a verb a surface word is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbTense {
    Present,
    Past,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    synsets: Vec<Synset>,
    #[serde(default)]
    verbs: Vec<VerbForms>,
}

#[derive(Debug)]
pub struct Lexicon {
    synsets: Vec<Synset>,
    verbs: Vec<VerbForms>,
    by_lemma: HashMap<(String, PartOfSpeech), Vec<usize>>,
    first_pos: HashMap<String, PartOfSpeech>,
    verb_forms: HashMap<String, (usize, VerbTense)>,
}

impl Lexicon {
    /// The lexicon compiled into the binary.
    pub fn bundled() -> Result<Self, HumanizerError> {
        Self::from_json(BUNDLED_LEXICON)
    }

    /// `.xml` files are read as WordNet-LMF, anything else as the JSON format.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HumanizerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        let lexicon = if is_xml {
            Self::from_wordnet(&raw)?
        } else {
            Self::from_json(&raw)?
        };
        info!(
            "Loaded lexicon from {} ({} synsets, {} verbs)",
            path.display(),
            lexicon.synsets.len(),
            lexicon.verbs.len()
        );
        Ok(lexicon)
    }

    pub fn from_json(raw: &str) -> Result<Self, HumanizerError> {
        let file: LexiconFile = serde_json::from_str(raw)?;
        Self::build(file.synsets, file.verbs)
    }

    /// Synsets from a WordNet-LMF document; verb forms from the bundled table,
    /// since WordNet does not tag inflections by tense.
    pub fn from_wordnet(xml: &str) -> Result<Self, HumanizerError> {
        let synsets = wordnet::parse_synsets(xml)?;
        let bundled: LexiconFile = serde_json::from_str(BUNDLED_LEXICON)?;
        Self::build(synsets, bundled.verbs)
    }

    fn build(synsets: Vec<Synset>, verbs: Vec<VerbForms>) -> Result<Self, HumanizerError> {
        let mut by_lemma: HashMap<(String, PartOfSpeech), Vec<usize>> = HashMap::new();
        let mut first_pos = HashMap::new();

        for (idx, synset) in synsets.iter().enumerate() {
            if synset.lemmas.iter().all(|l| l.trim().is_empty()) {
                return Err(HumanizerError::InvalidLexicon(format!(
                    "synset {idx} has no lemmas"
                )));
            }
            for lemma in &synset.lemmas {
                let key = lemma.to_lowercase();
                first_pos.entry(key.clone()).or_insert(synset.pos);
                let ids = by_lemma.entry((key, synset.pos)).or_default();
                if ids.last() != Some(&idx) {
                    ids.push(idx);
                }
            }
        }

        let mut verb_forms = HashMap::new();
        for (idx, verb) in verbs.iter().enumerate() {
            let forms = [&verb.base, &verb.third_person, &verb.past, &verb.participle];
            if forms.iter().any(|f| f.trim().is_empty()) {
                return Err(HumanizerError::InvalidLexicon(format!(
                    "verb {idx} ({}) has an empty form",
                    verb.base
                )));
            }
            // Present forms win over a past form spelled the same way ("read").
            verb_forms
                .entry(verb.past.to_lowercase())
                .or_insert((idx, VerbTense::Past));
            verb_forms.insert(verb.base.to_lowercase(), (idx, VerbTense::Present));
            verb_forms.insert(verb.third_person.to_lowercase(), (idx, VerbTense::Present));
        }

        Ok(Self {
            synsets,
            verbs,
            by_lemma,
            first_pos,
            verb_forms,
        })
    }

    /// Synsets containing `word` (case-insensitive) with the given part of speech, in file order.
    pub fn synsets_for<'a>(
        &'a self,
        word: &str,
        pos: PartOfSpeech,
    ) -> impl Iterator<Item = &'a Synset> + 'a {
        self.by_lemma
            .get(&(word.to_lowercase(), pos))
            .into_iter()
            .flatten()
            .map(move |&idx| &self.synsets[idx])
    }

    pub fn has_pos(&self, word: &str, pos: PartOfSpeech) -> bool {
        self.by_lemma.contains_key(&(word.to_lowercase(), pos))
    }

    /// Part of speech of the first synset that lists `word`.
    pub fn primary_pos(&self, word: &str) -> Option<PartOfSpeech> {
        self.first_pos.get(&word.to_lowercase()).copied()
    }

    /// Finite verb lookup: base and third-person forms are present, past forms are past.
    pub fn verb_form(&self, word: &str) -> Option<(&VerbForms, VerbTense)> {
        self.verb_forms
            .get(&word.to_lowercase())
            .map(|&(idx, tense)| (&self.verbs[idx], tense))
    }

    /// Reduces a comparative or superlative to an adjective the lexicon lists
    /// ("easier" → "easy", "largest" → "large", "bigger" → "big").
    pub fn adjective_base(&self, word: &str) -> Option<(String, Degree)> {
        let lower = word.to_lowercase();
        for (suffix, degree) in [("est", Degree::Superlative), ("er", Degree::Comparative)] {
            let Some(stem) = lower.strip_suffix(suffix) else {
                continue;
            };
            if stem.len() < 2 {
                continue;
            }
            let mut stems = vec![stem.to_string(), format!("{stem}e")];
            if let Some(s) = stem.strip_suffix('i') {
                stems.push(format!("{s}y"));
            }
            let mut tail = stem.chars().rev();
            if let (Some(last), Some(prev)) = (tail.next(), tail.next()) {
                if last == prev && last.is_ascii_alphabetic() {
                    stems.push(stem[..stem.len() - 1].to_string());
                }
            }
            if let Some(base) = stems
                .into_iter()
                .find(|s| self.has_pos(s, PartOfSpeech::Adjective))
            {
                return Some((base, degree));
            }
        }
        None
    }

    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }

    pub fn verb_count(&self) -> usize {
        self.verbs.len()
    }
}
