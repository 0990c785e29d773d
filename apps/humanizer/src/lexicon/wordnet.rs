//! WordNet-LMF reader, for Open English WordNet releases (`english-wordnet-*.xml`).
//!
//! Only lemmas, senses and synset membership are read. Relations, definitions
//! and examples are skipped by the deserializer.

use std::collections::HashMap;

use serde::Deserialize;

use crate::errors::HumanizerError;
use crate::lexicon::{PartOfSpeech, Synset};

#[derive(Debug, Deserialize)]
struct LexicalResource {
    #[serde(rename = "Lexicon", default)]
    lexicons: Vec<LmfLexicon>,
}

#[derive(Debug, Deserialize)]
struct LmfLexicon {
    #[serde(rename = "LexicalEntry", default)]
    entries: Vec<LexicalEntry>,
    #[serde(rename = "Synset", default)]
    synsets: Vec<LmfSynset>,
}

#[derive(Debug, Deserialize)]
struct LexicalEntry {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "Lemma")]
    lemma: Lemma,
    #[serde(rename = "Sense", default)]
    senses: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Lemma {
    #[serde(rename = "@writtenForm")]
    written_form: String,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@synset")]
    synset: String,
}

#[derive(Debug, Deserialize)]
struct LmfSynset {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@partOfSpeech")]
    part_of_speech: String,
    /// Entry ids (LMF 1.1+) or sense ids, space separated. Older files omit it.
    #[serde(rename = "@members", default)]
    members: String,
}

/// WordNet letters: `a` adjective, `s` adjective satellite, `r` adverb, `n`, `v`.
fn map_pos(letter: &str) -> Option<PartOfSpeech> {
    match letter {
        "a" | "s" => Some(PartOfSpeech::Adjective),
        "r" => Some(PartOfSpeech::Adverb),
        "n" => Some(PartOfSpeech::Noun),
        "v" => Some(PartOfSpeech::Verb),
        _ => None,
    }
}

/// Synsets in file order, lemmas in member order. Multiword lemmas keep their spaces.
pub fn parse_synsets(xml: &str) -> Result<Vec<Synset>, HumanizerError> {
    let resource: LexicalResource = quick_xml::de::from_str(xml)?;
    let mut synsets = Vec::new();

    for lexicon in resource.lexicons {
        let mut lemma_of: HashMap<&str, &str> = HashMap::new();
        let mut by_synset: HashMap<&str, Vec<&str>> = HashMap::new();
        for entry in &lexicon.entries {
            let form = entry.lemma.written_form.as_str();
            lemma_of.insert(entry.id.as_str(), form);
            for sense in &entry.senses {
                lemma_of.insert(sense.id.as_str(), form);
                by_synset.entry(sense.synset.as_str()).or_default().push(form);
            }
        }

        for synset in &lexicon.synsets {
            let Some(pos) = map_pos(&synset.part_of_speech) else {
                continue;
            };
            let mut lemmas: Vec<String> = Vec::new();
            let members: Vec<&str> = if synset.members.trim().is_empty() {
                by_synset.get(synset.id.as_str()).cloned().unwrap_or_default()
            } else {
                synset
                    .members
                    .split_whitespace()
                    .filter_map(|m| lemma_of.get(m).copied())
                    .collect()
            };
            for form in members {
                if !lemmas.iter().any(|l| l == form) {
                    lemmas.push(form.to_string());
                }
            }
            if !lemmas.is_empty() {
                synsets.push(Synset { pos, lemmas });
            }
        }
    }

    Ok(synsets)
}
