//! Passive-voice conversion for plain `Subject Verb Object.` sentences.
//!
//! # Heuristic
//! The sentence must be nothing but word tokens followed by a terminator run
//! (`.`, `!`, `?`), shaped as:
//! - Subject: a subject pronoun (`I we you he she they it`), a determiner plus
//!   one noun (`the team`), or one capitalised name (`Maria`)
//! - Verb: a present or past form from the lexicon's verb table, or a regular
//!   `-ed` past right after a pronoun subject
//! - Object: 1 to 4 words with no prepositions, conjunctions, auxiliaries,
//!   adverbs or further verbs
//!
//! Anything else is left alone. `We designed the system.` becomes
//! `The system was designed by us.`

use rand::Rng;

use crate::lexicon::{Lexicon, PartOfSpeech, VerbTense};
use crate::syntactic::roll;
use crate::text::tokenize;

const SUBJECT_PRONOUNS: &[(&str, &str)] = &[
    ("i", "me"),
    ("we", "us"),
    ("you", "you"),
    ("he", "him"),
    ("she", "her"),
    ("they", "them"),
    ("it", "it"),
];

const OBJECT_PRONOUNS: &[(&str, &str)] = &[
    ("me", "I"),
    ("us", "we"),
    ("you", "you"),
    ("him", "he"),
    ("her", "she"),
    ("them", "they"),
    ("it", "it"),
];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "our", "my", "your", "their", "his",
    "her", "its",
];

const BLOCKING_WORDS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "without", "to", "from", "into", "onto",
    "over", "under", "about", "through", "after", "before", "during", "and", "or", "but",
    "so", "because", "that", "which", "who", "if", "when", "while", "than", "as", "not",
    "never", "is", "am", "are", "was", "were", "be", "been", "has", "have", "had", "will",
    "would", "can", "could", "should", "may", "might", "must", "very", "too", "also", "just",
    "there", "here", "then", "now",
];

/// The pieces of a sentence that matched the heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassiveClause {
    pub subject: Vec<String>,
    pub verb: String,
    pub object: Vec<String>,
    pub participle: String,
    pub tense: VerbTense,
    pub terminator: String,
}

impl PassiveClause {
    /// `Object is|are|was|were <participle> by <agent><terminator>`.
    pub fn render(&self) -> String {
        let object = self.object_as_subject();
        let aux = self.auxiliary(&object);
        let mut out = capitalize(&object.join(" "));
        out.push(' ');
        out.push_str(aux);
        out.push(' ');
        out.push_str(&self.participle);
        out.push_str(" by ");
        out.push_str(&self.agent().join(" "));
        out.push_str(&self.terminator);
        out
    }

    fn object_as_subject(&self) -> Vec<String> {
        if let [single] = self.object.as_slice() {
            let lower = single.to_lowercase();
            if let Some((_, subject)) = OBJECT_PRONOUNS.iter().find(|(o, _)| *o == lower) {
                return vec![subject.to_string()];
            }
        }
        self.object.clone()
    }

    fn agent(&self) -> Vec<String> {
        if let [single] = self.subject.as_slice() {
            let lower = single.to_lowercase();
            if let Some((_, object)) = SUBJECT_PRONOUNS.iter().find(|(s, _)| *s == lower) {
                return vec![object.to_string()];
            }
            return self.subject.clone();
        }
        let mut agent = self.subject.clone();
        if DETERMINERS.contains(&agent[0].to_lowercase().as_str()) {
            agent[0] = agent[0].to_lowercase();
        }
        agent
    }

    fn auxiliary(&self, new_subject: &[String]) -> &'static str {
        let head = new_subject.last().map(|w| w.to_lowercase()).unwrap_or_default();
        let first_person = new_subject.len() == 1 && head == "i";
        let plural = (new_subject.len() == 1 && matches!(head.as_str(), "we" | "they" | "you"))
            || looks_plural(&head);
        match (self.tense, first_person, plural) {
            (VerbTense::Present, true, _) => "am",
            (VerbTense::Present, _, true) => "are",
            (VerbTense::Present, _, false) => "is",
            (VerbTense::Past, true, _) => "was",
            (VerbTense::Past, _, true) => "were",
            (VerbTense::Past, _, false) => "was",
        }
    }
}

fn looks_plural(word: &str) -> bool {
    word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Matches `sentence` against the heuristic. `None` means the sentence is not eligible.
pub fn passive_pattern(lexicon: &Lexicon, sentence: &str) -> Option<PassiveClause> {
    let tokens = tokenize(sentence);
    let (last, words) = tokens.split_last()?;
    if last.is_word() || !last.text.chars().all(|c| matches!(c, '.' | '!' | '?')) {
        return None;
    }
    if words.iter().any(|t| !t.is_word()) || !(3..=7).contains(&words.len()) {
        return None;
    }
    let words: Vec<&str> = words.iter().map(|t| t.text.as_str()).collect();

    let (subject_len, pronoun_subject) = parse_subject(lexicon, &words)?;
    let verb = words[subject_len];
    let (participle, tense) = match lexicon.verb_form(verb) {
        Some((forms, tense)) => (forms.participle.clone(), tense),
        None if pronoun_subject && verb.len() > 4 && verb.to_lowercase().ends_with("ed") => {
            (verb.to_lowercase(), VerbTense::Past)
        }
        None => return None,
    };

    let object = &words[subject_len + 1..];
    if object.is_empty() || object.len() > 4 || !object.iter().all(|w| is_object_word(lexicon, w))
    {
        return None;
    }

    Some(PassiveClause {
        subject: words[..subject_len].iter().map(|w| w.to_string()).collect(),
        verb: verb.to_string(),
        object: object.iter().map(|w| w.to_string()).collect(),
        participle,
        tense,
        terminator: last.text.clone(),
    })
}

/// Returns the subject length in words and whether it is a pronoun.
fn parse_subject(lexicon: &Lexicon, words: &[&str]) -> Option<(usize, bool)> {
    let first = words[0].to_lowercase();
    if SUBJECT_PRONOUNS.iter().any(|(s, _)| *s == first) {
        return Some((1, true));
    }
    if DETERMINERS.contains(&first.as_str()) {
        let noun = words[1];
        let lower = noun.to_lowercase();
        if BLOCKING_WORDS.contains(&lower.as_str())
            || lexicon.has_pos(noun, PartOfSpeech::Adjective)
            || lexicon.has_pos(noun, PartOfSpeech::Adverb)
        {
            return None;
        }
        return Some((2, false));
    }
    let capitalised = words[0].chars().next().is_some_and(|c| c.is_ascii_uppercase());
    if capitalised
        && !BLOCKING_WORDS.contains(&first.as_str())
        && lexicon.verb_form(words[0]).is_none()
        && lexicon.primary_pos(words[0]).is_none()
        && !first.ends_with("ly")
    {
        return Some((1, false));
    }
    None
}

fn is_object_word(lexicon: &Lexicon, word: &str) -> bool {
    let lower = word.to_lowercase();
    !BLOCKING_WORDS.contains(&lower.as_str())
        && !SUBJECT_PRONOUNS
            .iter()
            .any(|(s, _)| *s == lower && !matches!(lower.as_str(), "it" | "you"))
        && lexicon.verb_form(word).is_none()
        && !lexicon.has_pos(word, PartOfSpeech::Adverb)
        && !(lower.len() > 4 && lower.ends_with("ly"))
}

pub fn maybe_passivize<R: Rng>(
    lexicon: &Lexicon,
    sentence: &str,
    enabled: bool,
    probability: f64,
    rng: &mut R,
) -> String {
    if !enabled {
        return sentence.to_string();
    }
    let Some(clause) = passive_pattern(lexicon, sentence) else {
        return sentence.to_string();
    };
    if roll(rng, probability) {
        clause.render()
    } else {
        sentence.to_string()
    }
}
