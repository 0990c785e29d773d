//! Default tagger: Wiktionary parts of speech from `layered-part-of-speech`,
//! disambiguated with the rule tagger's context.
//!
//! The dictionary lists every part of speech a word can take ("deep" is an
//! adjective, an adverb and a noun), so it supplies candidates and the rules
//! pick one:
//! - a rule tag backed by a word list or the lexicon is kept as is
//! - a spelling guess the dictionary confirms is kept
//! - an adjective reading wins in attributive ("deep learning") or predicative
//!   ("is deep") position
//! - otherwise the first candidate in `FALLBACK_ORDER`
//!
//! Words the dictionary does not know keep the rule tag.

use std::collections::HashMap;
use std::sync::Arc;

use layered_nlp::{create_line_from_string, x, LToken};
use layered_part_of_speech::{POSTagResolver, Tag as DictTag};

use crate::errors::HumanizerError;
use crate::lexicon::Lexicon;
use crate::tagging::lexicon_tagger::Evidence;
use crate::tagging::{LexiconTagger, PosTagger, Tag};

const FALLBACK_ORDER: [Tag; 6] = [
    Tag::Noun,
    Tag::Verb,
    Tag::ProperNoun,
    Tag::Pronoun,
    Tag::Adverb,
    Tag::Adjective,
];

thread_local! {
    static RESOLVER: POSTagResolver = POSTagResolver::default();
}

fn dictionary_tags() -> [(DictTag, Tag); 6] {
    [
        (DictTag::Adjective, Tag::Adjective),
        (DictTag::Adverb, Tag::Adverb),
        (DictTag::Noun, Tag::Noun),
        (DictTag::ProperNoun, Tag::ProperNoun),
        (DictTag::Pronoun, Tag::Pronoun),
        (DictTag::Verb, Tag::Verb),
    ]
}

#[derive(Clone)]
pub struct DictionaryTagger {
    rules: LexiconTagger,
}

impl DictionaryTagger {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            rules: LexiconTagger::new(lexicon),
        }
    }
}

impl PosTagger for DictionaryTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError> {
        let ruled = self.rules.tag_with_evidence(sentence);
        let mut candidates = dictionary_candidates(sentence);

        let offsets = token_offsets(sentence, ruled.iter().map(|(text, _, _)| text.as_str()));
        let mut tagged = Vec::with_capacity(ruled.len());

        for (idx, (text, rule, evidence)) in ruled.iter().enumerate() {
            let found = offsets[idx]
                .and_then(|offset| candidates.remove(&offset))
                .filter(|(dict_text, _)| dict_text == text)
                .map(|(_, tags)| tags)
                .unwrap_or_default();

            let next_is_word = ruled
                .get(idx + 1)
                .is_some_and(|(_, t, _)| *t != Tag::Punctuation);
            let prev = tagged.last().map(|(_, t): &(String, Tag)| *t);

            let tag = resolve(*rule, *evidence, &found, next_is_word, prev);
            tagged.push((text.clone(), tag));
        }

        Ok(tagged)
    }
}

/// Byte offset of each token, found by scanning forward through the sentence.
fn token_offsets<'a>(sentence: &str, tokens: impl Iterator<Item = &'a str>) -> Vec<Option<usize>> {
    let mut cursor = 0;
    tokens
        .map(|text| {
            let start = cursor + sentence[cursor..].find(text)?;
            cursor = start + text.len();
            Some(start)
        })
        .collect()
}

/// Dictionary readings keyed by the byte offset where the word starts.
fn dictionary_candidates(sentence: &str) -> HashMap<usize, (String, Vec<Tag>)> {
    let line = RESOLVER.with(|resolver| create_line_from_string(sentence).run(resolver));
    let tokens = line.ll_tokens();

    let mut readings: Vec<Vec<Tag>> = vec![Vec::new(); tokens.len()];
    for (dict_tag, tag) in dictionary_tags() {
        for found in line.find(&x::attr_eq(&dict_tag)) {
            let (start, _end) = found.range();
            if let Some(tags) = readings.get_mut(start) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }
    }

    let mut by_offset = HashMap::new();
    let mut cursor = 0;
    for (token, tags) in tokens.iter().zip(readings) {
        let LToken::Text(text, _) = token.get_token() else {
            continue;
        };
        let Some(rel) = sentence[cursor..].find(text.as_str()) else {
            continue;
        };
        let start = cursor + rel;
        cursor = start + text.len();
        if !tags.is_empty() {
            by_offset.insert(start, (text.clone(), tags));
        }
    }
    by_offset
}

fn resolve(
    rule: Tag,
    evidence: Evidence,
    candidates: &[Tag],
    next_is_word: bool,
    prev: Option<Tag>,
) -> Tag {
    if evidence == Evidence::Listed || candidates.is_empty() || rule == Tag::ProperNoun {
        return rule;
    }
    if rule.coarse().is_some() && candidates.contains(&rule) {
        return rule;
    }
    if candidates.contains(&Tag::Adjective) && (next_is_word || prev == Some(Tag::Verb)) {
        return Tag::Adjective;
    }
    if candidates.contains(&rule) {
        return rule;
    }
    FALLBACK_ORDER
        .into_iter()
        .find(|tag| candidates.contains(tag))
        .unwrap_or(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    fn tagger() -> DictionaryTagger {
        DictionaryTagger::new(Arc::new(Lexicon::bundled().unwrap()))
    }

    fn tag_of(tagged: &[(String, Tag)], word: &str) -> Tag {
        tagged
            .iter()
            .find(|(text, _)| text == word)
            .map(|(_, tag)| *tag)
            .unwrap_or_else(|| panic!("{word} not tagged"))
    }

    #[test]
    fn test_listed_rule_tags_are_kept() {
        let tag = resolve(Tag::Determiner, Evidence::Listed, &[Tag::Noun], true, None);
        assert_eq!(tag, Tag::Determiner);
    }

    #[test]
    fn test_attributive_adjective_beats_noun_guess() {
        let candidates = [Tag::Adjective, Tag::Adverb, Tag::Noun];
        assert_eq!(
            resolve(Tag::Noun, Evidence::Guessed, &candidates, true, Some(Tag::Preposition)),
            Tag::Adjective
        );
        assert_eq!(
            resolve(Tag::Noun, Evidence::Guessed, &candidates, false, Some(Tag::Verb)),
            Tag::Adjective
        );
        assert_eq!(
            resolve(Tag::Noun, Evidence::Guessed, &candidates, false, Some(Tag::Determiner)),
            Tag::Noun
        );
    }

    #[test]
    fn test_confirmed_suffix_guess_is_kept() {
        let candidates = [Tag::Adverb, Tag::Adjective];
        assert_eq!(
            resolve(Tag::Adverb, Evidence::Guessed, &candidates, true, None),
            Tag::Adverb
        );
    }

    #[test]
    fn test_unconfirmed_guess_falls_back_in_order() {
        assert_eq!(
            resolve(Tag::Verb, Evidence::Guessed, &[Tag::Adverb, Tag::Noun], false, None),
            Tag::Noun
        );
        assert_eq!(resolve(Tag::Noun, Evidence::Guessed, &[], true, None), Tag::Noun);
    }

    #[test]
    fn test_capitalised_guess_stays_proper_noun() {
        assert_eq!(
            resolve(Tag::ProperNoun, Evidence::Guessed, &[Tag::Adjective], true, None),
            Tag::ProperNoun
        );
    }

    #[test]
    fn test_token_offsets_follow_the_sentence() {
        let sentence = "It is 40\\% done.";
        let tokens = tokenize(sentence);
        let offsets = token_offsets(sentence, tokens.iter().map(|t| t.text.as_str()));
        assert_eq!(offsets, vec![Some(0), Some(3), Some(6), Some(8), Some(11), Some(15)]);
    }

    #[test]
    fn test_dictionary_marks_unlisted_adjective() {
        let tagged = tagger()
            .tag("We reported strong results for deep learning.")
            .unwrap();
        assert_eq!(tag_of(&tagged, "deep"), Tag::Adjective);
        assert_eq!(tag_of(&tagged, "We"), Tag::Pronoun);
    }

    #[test]
    fn test_output_aligns_with_tokens() {
        let sentence = "The largest team shipped 3 releases (mostly on time)!";
        let tagged = tagger().tag(sentence).unwrap();
        let tokens = tokenize(sentence);
        assert_eq!(tagged.len(), tokens.len());
        for ((text, _), token) in tagged.iter().zip(&tokens) {
            assert_eq!(text, &token.text);
        }
    }
}
