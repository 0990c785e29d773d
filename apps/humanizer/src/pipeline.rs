//! Humanizer pipeline — the one entry point the surrounding service calls.
//!
//! Flow: protect newlines → segment → per sentence: expand contractions →
//!       tokenize → tag → synonyms → reassemble → passive → transition →
//!       rejoin → finalize (cleanup, newline restore, trim, escape repair).
//!
//! Resources (lexicon, tagger) are loaded once and shared read-only, so one
//! `Humanizer` can serve concurrent calls without locking. Per-call switches
//! live in `TransformConfig`; randomness comes from the caller's RNG.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::errors::HumanizerError;
use crate::lexical::substitute_tokens;
use crate::lexicon::Lexicon;
use crate::sanitize::{finalize, reassemble};
use crate::syntactic::{expand_contractions, maybe_insert_transition, maybe_passivize};
use crate::tagging::{DictionaryTagger, PosTagger, Tag};
use crate::text::{protect_newlines, segment, split_leading, tokenize, Token, NEWLINE_PLACEHOLDER};

pub const DEFAULT_P_PASSIVE: f64 = 0.3;
pub const DEFAULT_P_TRANSITION: f64 = 0.4;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Per-call switches. Contraction expansion is not switchable; it always runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub synonym_replacement: bool,
    pub passive_voice: bool,
    pub academic_transitions: bool,
    /// Chance that an eligible sentence is passivized.
    pub p_passive: f64,
    /// Chance that a sentence gets a transition phrase.
    pub p_transition: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            synonym_replacement: false,
            passive_voice: false,
            academic_transitions: false,
            p_passive: DEFAULT_P_PASSIVE,
            p_transition: DEFAULT_P_TRANSITION,
        }
    }
}

impl TransformConfig {
    pub fn all() -> Self {
        Self {
            synonym_replacement: true,
            passive_voice: true,
            academic_transitions: true,
            ..Self::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Humanizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Humanizer {
    lexicon: Arc<Lexicon>,
    tagger: Arc<dyn PosTagger>,
}

impl Humanizer {
    pub fn new(lexicon: Arc<Lexicon>, tagger: Arc<dyn PosTagger>) -> Self {
        Self { lexicon, tagger }
    }

    /// Uses the default `DictionaryTagger` over the same lexicon.
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        let tagger = Arc::new(DictionaryTagger::new(lexicon.clone()));
        Self::new(lexicon, tagger)
    }

    pub fn with_bundled_resources() -> Result<Self, HumanizerError> {
        Ok(Self::with_lexicon(Arc::new(Lexicon::bundled()?)))
    }

    /// Humanizes `text` with the thread-local RNG.
    pub fn humanize(&self, text: &str, config: &TransformConfig) -> String {
        let mut rng = rand::rng();
        self.humanize_with_rng(text, config, &mut rng)
    }

    /// Deterministic for a given seed; falls back to `humanize` without one.
    pub fn humanize_seeded(&self, text: &str, config: &TransformConfig, seed: Option<u64>) -> String {
        match seed {
            Some(seed) => self.humanize_with_rng(text, config, &mut StdRng::seed_from_u64(seed)),
            None => self.humanize(text, config),
        }
    }

    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn humanize_with_rng<R: Rng>(
        &self,
        text: &str,
        config: &TransformConfig,
        rng: &mut R,
    ) -> String {
        let protected = protect_newlines(text);
        let sentences = segment(&protected);
        let mut out = String::with_capacity(protected.len() + protected.len() / 4);
        let mut passthrough = 0;

        for (idx, sentence) in sentences.iter().enumerate() {
            let (prefix, rest) = split_leading(&sentence.text);
            let body = rest.trim_end();
            let suffix = &rest[body.len()..];
            out.push_str(prefix);

            if !body.is_empty() {
                // Rewrites that reshape a whole sentence only apply to units that stand alone,
                // so "3.5" or "e.g.x" fragments are never prefixed or reordered.
                let starts_clean = idx == 0 || !prefix.is_empty();
                let ends_clean = sentences
                    .get(idx + 1)
                    .map_or(true, |next| next.text.starts_with(is_separator));
                let standalone = starts_clean && ends_clean;

                let whole = standalone && sentence.terminated;
                // A panicking tagger only loses its own sentence.
                let attempt = catch_unwind(AssertUnwindSafe(|| {
                    self.transform_sentence(body, config, whole, &mut *rng)
                }));
                match attempt {
                    Ok(Ok(rewritten)) => out.push_str(&rewritten),
                    Ok(Err(e)) => {
                        if e.is_recoverable() {
                            warn!(error = %e, "Passing sentence through unchanged");
                        } else {
                            error!(error = %e, "Unexpected sentence failure, passing through");
                        }
                        passthrough += 1;
                        out.push_str(&expand_contractions(body));
                    }
                    Err(_) => {
                        error!("Sentence transform panicked, passing through");
                        passthrough += 1;
                        out.push_str(&expand_contractions(body));
                    }
                }
            }

            out.push_str(suffix);
        }

        debug!(sentences = sentences.len(), passthrough, "Humanized document");
        finalize(&out)
    }

    fn transform_sentence<R: Rng>(
        &self,
        body: &str,
        config: &TransformConfig,
        whole_sentence: bool,
        rng: &mut R,
    ) -> Result<String, HumanizerError> {
        let expanded = expand_contractions(body);
        let mut tokens = tokenize(&expanded);
        let tags = self.aligned_tags(&expanded, &tokens)?;

        if config.synonym_replacement {
            substitute_tokens(&self.lexicon, &mut tokens, &tags);
        }

        let mut rewritten = reassemble(&tokens);
        if whole_sentence && starts_with_letter(&rewritten) {
            rewritten = maybe_passivize(
                &self.lexicon,
                &rewritten,
                config.passive_voice,
                config.p_passive,
                rng,
            );
            rewritten = maybe_insert_transition(
                &rewritten,
                config.academic_transitions,
                config.p_transition,
                rng,
            );
        }
        Ok(rewritten)
    }

    /// Tags the sentence and checks the tagger saw the same tokens we did.
    fn aligned_tags(&self, sentence: &str, tokens: &[Token]) -> Result<Vec<Tag>, HumanizerError> {
        let tagged = self.tagger.tag(sentence)?;
        if tagged.len() != tokens.len() {
            return Err(HumanizerError::Tagging(format!(
                "tagger returned {} tokens, expected {}",
                tagged.len(),
                tokens.len()
            )));
        }
        tagged
            .into_iter()
            .zip(tokens)
            .map(|((text, tag), token)| {
                if text == token.text {
                    Ok(tag)
                } else {
                    Err(HumanizerError::Tagging(format!(
                        "tagger token {text:?} does not match {:?}",
                        token.text
                    )))
                }
            })
            .collect()
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == NEWLINE_PLACEHOLDER
}

fn starts_with_letter(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

// ────────────────────────────────────────────────────────────────────────────
// Async wrapper
// ────────────────────────────────────────────────────────────────────────────

/// Runs one CPU-bound humanize call on the blocking pool under a deadline.
///
/// The deadline only stops the wait: a blocking task cannot be cancelled, so a
/// stalled call keeps its pool thread until it returns on its own. Callers
/// that fan out (such as `humanize_sections`) can therefore hold several
/// threads busy after reporting `Timeout`.
pub async fn humanize_with_timeout(
    humanizer: Arc<Humanizer>,
    text: String,
    config: TransformConfig,
    seed: Option<u64>,
    limit: Duration,
) -> Result<String, HumanizerError> {
    let task =
        tokio::task::spawn_blocking(move || humanizer.humanize_seeded(&text, &config, seed));

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(join_err)) => Err(HumanizerError::Task(join_err.to_string())),
        Err(_) => Err(HumanizerError::Timeout { limit }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::clean_symbols;
    use crate::syntactic::transitions::starts_with_transition;
    use crate::tagging::LexiconTagger;

    fn humanizer() -> Humanizer {
        Humanizer::with_bundled_resources().unwrap()
    }

    fn off() -> TransformConfig {
        TransformConfig::default()
    }

    /// Fails on any sentence mentioning "boom".
    struct FlakyTagger(LexiconTagger);

    impl PosTagger for FlakyTagger {
        fn tag(&self, sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError> {
            if sentence.contains("boom") {
                Err(HumanizerError::Tagging("boom".to_string()))
            } else {
                self.0.tag(sentence)
            }
        }
    }

    /// Drops the last token, which the alignment check must catch.
    struct ShortTagger(LexiconTagger);

    impl PosTagger for ShortTagger {
        fn tag(&self, sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError> {
            let mut tagged = self.0.tag(sentence)?;
            tagged.pop();
            Ok(tagged)
        }
    }

    /// Panics on any sentence mentioning "boom".
    struct PanickingTagger(LexiconTagger);

    impl PosTagger for PanickingTagger {
        fn tag(&self, sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError> {
            if sentence.contains("boom") {
                panic!("tagger blew up");
            }
            self.0.tag(sentence)
        }
    }

    struct SlowTagger;

    impl PosTagger for SlowTagger {
        fn tag(&self, _sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Vec::new())
        }
    }

    fn with_tagger<T: PosTagger + 'static>(make: impl FnOnce(LexiconTagger) -> T) -> Humanizer {
        let lexicon = Arc::new(Lexicon::bundled().unwrap());
        let inner = LexiconTagger::new(lexicon.clone());
        Humanizer::new(lexicon, Arc::new(make(inner)))
    }

    #[test]
    fn test_end_to_end_contractions_only() {
        let out = humanizer().humanize("I think we rushed it. It's fine though.", &off());
        assert_eq!(out, "I think we rushed it. It is fine though.");
    }

    #[test]
    fn test_newline_round_trip_with_transforms_off() {
        assert_eq!(humanizer().humanize("A.\nB.", &off()), "A.\nB.");
    }

    #[test]
    fn test_paragraph_breaks_survive() {
        let text = "First paragraph ends here.\n\nSecond one starts here.";
        assert_eq!(humanizer().humanize(text, &off()), text);
    }

    #[test]
    fn test_config_off_path_is_idempotent() {
        let h = humanizer();
        let text = "We didn’t plan it.  It's  done (mostly) , honestly!\nNext: we'll see.";
        let once = h.humanize(text, &off());
        assert_eq!(h.humanize(&once, &off()), once);
        assert!(!once.contains("n’t") && !once.contains("'s"));
    }

    #[test]
    fn test_synonyms_only_touch_adjectives_and_adverbs() {
        let config = TransformConfig {
            synonym_replacement: true,
            ..off()
        };
        let out = humanizer().humanize("The cat runs quickly.", &config);
        let words: Vec<&str> = out.split_whitespace().collect();
        assert_eq!(&words[..3], &["The", "cat", "runs"]);
        assert_eq!(out, "The cat runs rapidly.");
    }

    #[test]
    fn test_comparatives_get_synonyms() {
        let config = TransformConfig {
            synonym_replacement: true,
            ..off()
        };
        let out = humanizer().humanize("This approach is easier.", &config);
        assert_eq!(out, "This approach is more simple.");
    }

    #[test]
    fn test_passive_and_transition_with_certainty() {
        let config = TransformConfig {
            passive_voice: true,
            academic_transitions: true,
            p_passive: 1.0,
            p_transition: 1.0,
            ..off()
        };
        let mut rng = StdRng::seed_from_u64(21);
        let out = humanizer().humanize_with_rng("We designed the system.", &config, &mut rng);
        assert!(starts_with_transition(&out), "no transition in {out:?}");
        assert!(out.ends_with(" the system was designed by us."), "got {out:?}");
    }

    #[test]
    fn test_zero_probabilities_leave_structure_alone() {
        let config = TransformConfig {
            passive_voice: true,
            academic_transitions: true,
            p_passive: 0.0,
            p_transition: 0.0,
            ..off()
        };
        let text = "We designed the system. The team builds dashboards.";
        let h = humanizer();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(h.humanize_with_rng(text, &config, &mut rng), text);
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let h = humanizer();
        let text = "We designed the system. The results were clear. She writes reports.";
        let a = h.humanize_seeded(text, &TransformConfig::all(), Some(99));
        let b = h.humanize_seeded(text, &TransformConfig::all(), Some(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fragments_never_get_transitions() {
        let config = TransformConfig {
            academic_transitions: true,
            p_transition: 1.0,
            ..off()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let out = humanizer().humanize_with_rng(
            "Revenue grew 3.5 percent. Led a team of five",
            &config,
            &mut rng,
        );
        assert!(out.contains("3.5 percent."), "decimal split in {out:?}");
        assert!(out.ends_with(" Led a team of five"), "tail rewritten in {out:?}");
    }

    #[test]
    fn test_unterminated_text_is_kept() {
        let out = humanizer().humanize("Reduced latency by half", &off());
        assert_eq!(out, "Reduced latency by half");
    }

    #[test]
    fn test_latex_specials_survive() {
        let text = r"Cut costs by 40\% and shipped \#1 feature.";
        assert_eq!(humanizer().humanize(text, &off()), text);
    }

    #[test]
    fn test_output_never_contains_broken_escape() {
        let h = humanizer();
        let mut rng = StdRng::seed_from_u64(8);
        let text = r"Saved \ $200 for R\ &D. The team\ _ builds dashboards. We fixed \ {it\ }.";
        let out = h.humanize_with_rng(text, &TransformConfig::all(), &mut rng);
        for special in crate::sanitize::LATEX_SPECIALS {
            assert!(!out.contains(&format!("\\ {special}")), "broken escape in {out:?}");
        }
    }

    #[test]
    fn test_tagging_failure_passes_sentence_through() {
        let h = with_tagger(FlakyTagger);
        let out = h.humanize("It's fine. This boom isn't dropped. It's over.", &off());
        assert_eq!(out, "It is fine. This boom is not dropped. It is over.");
    }

    #[test]
    fn test_misaligned_tagger_output_is_a_tagging_failure() {
        let h = with_tagger(ShortTagger);
        let config = TransformConfig {
            synonym_replacement: true,
            ..off()
        };
        let out = h.humanize("It's quickly fine.", &config);
        assert_eq!(out, "It is quickly fine.");
    }

    #[test]
    fn test_tagger_panic_passes_sentence_through() {
        let h = with_tagger(PanickingTagger);
        let config = TransformConfig {
            synonym_replacement: true,
            ..off()
        };
        let out = h.humanize("The cat runs quickly. The boom isn't quickly over.", &config);
        assert_eq!(out, "The cat runs rapidly. The boom is not quickly over.");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let h = humanizer();
        assert_eq!(h.humanize("", &off()), "");
        assert_eq!(h.humanize("  \n  ", &off()), "");
    }

    #[test]
    fn test_output_is_clean_fixed_point() {
        let h = humanizer();
        let out = h.humanize("Word , spaced   oddly ( here ) .", &off());
        assert_eq!(clean_symbols(&out), out);
    }

    #[test]
    fn test_transform_config_deserializes_with_defaults() {
        let config: TransformConfig =
            serde_json::from_str(r#"{"synonym_replacement": true}"#).unwrap();
        assert!(config.synonym_replacement);
        assert!(!config.passive_voice);
        assert!((config.p_passive - DEFAULT_P_PASSIVE).abs() < f64::EPSILON);
        assert!((config.p_transition - DEFAULT_P_TRANSITION).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_humanize_with_timeout_completes() {
        let h = Arc::new(humanizer());
        let out = humanize_with_timeout(
            h,
            "It's fine.".to_string(),
            off(),
            Some(1),
            Duration::from_secs(10),
        )
        .await
        .unwrap();
        assert_eq!(out, "It is fine.");
    }

    #[tokio::test]
    async fn test_humanize_with_timeout_expires() {
        let lexicon = Arc::new(Lexicon::bundled().unwrap());
        let h = Arc::new(Humanizer::new(lexicon, Arc::new(SlowTagger)));
        let err = humanize_with_timeout(
            h,
            "One. Two. Three.".to_string(),
            off(),
            None,
            Duration::from_millis(20),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HumanizerError::Timeout { .. }));
        assert_eq!(err.to_string(), "Humanization timed out after 20ms");
    }
}
