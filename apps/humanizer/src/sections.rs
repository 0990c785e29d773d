//! Section-by-section humanization of an extracted resume.
//!
//! The resume is split into titled chunks upstream; each chunk is humanized on
//! its own so one bad section cannot stall the rest. If any section fails, the
//! whole batch fails: stitching a partially humanized resume back into its
//! template is not allowed.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::HumanizerError;
use crate::pipeline::{humanize_with_timeout, Humanizer, TransformConfig};

/// One titled section of resume prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub section_title: String,
    pub section_content: String,
}

/// Humanizes every chunk in order. Blank chunks pass through untouched.
///
/// With a seed, chunk `i` uses `seed + i` so reruns are reproducible.
pub async fn humanize_sections(
    humanizer: Arc<Humanizer>,
    chunks: Vec<TextChunk>,
    config: TransformConfig,
    seed: Option<u64>,
    limit: Duration,
) -> Result<Vec<TextChunk>, HumanizerError> {
    let mut humanized = Vec::with_capacity(chunks.len());
    let mut failed = Vec::new();

    for (idx, chunk) in chunks.into_iter().enumerate() {
        if chunk.section_content.trim().is_empty() {
            humanized.push(chunk);
            continue;
        }

        info!(
            "Humanizing section '{}' ({} chars)",
            chunk.section_title,
            chunk.section_content.len()
        );
        let chunk_seed = seed.map(|s| s.wrapping_add(idx as u64));

        match humanize_with_timeout(
            humanizer.clone(),
            chunk.section_content,
            config,
            chunk_seed,
            limit,
        )
        .await
        {
            Ok(section_content) => humanized.push(TextChunk {
                section_title: chunk.section_title,
                section_content,
            }),
            Err(e) => {
                warn!("Failed to humanize section '{}': {e}", chunk.section_title);
                failed.push(chunk.section_title);
            }
        }
    }

    if !failed.is_empty() {
        return Err(HumanizerError::SectionsFailed(failed));
    }

    info!("Humanized {} sections", humanized.len());
    Ok(humanized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::tagging::{PosTagger, Tag};

    fn chunk(title: &str, content: &str) -> TextChunk {
        TextChunk {
            section_title: title.to_string(),
            section_content: content.to_string(),
        }
    }

    fn humanizer() -> Arc<Humanizer> {
        Arc::new(Humanizer::with_bundled_resources().unwrap())
    }

    struct StallingTagger;

    impl PosTagger for StallingTagger {
        fn tag(&self, sentence: &str) -> Result<Vec<(String, Tag)>, HumanizerError> {
            if sentence.contains("Kubernetes") {
                std::thread::sleep(Duration::from_millis(400));
            }
            Ok(crate::text::tokenize(sentence)
                .into_iter()
                .map(|t| (t.text, Tag::Other))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_sections_keep_titles_and_order() {
        let chunks = vec![
            chunk("Summary", "I'm a backend engineer. We didn't stop."),
            chunk("Experience", "Led a team of five"),
        ];
        let out = humanize_sections(
            humanizer(),
            chunks,
            TransformConfig::default(),
            Some(1),
            Duration::from_secs(10),
        )
        .await
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].section_title, "Summary");
        assert_eq!(out[0].section_content, "I am a backend engineer. We did not stop.");
        assert_eq!(out[1], chunk("Experience", "Led a team of five"));
    }

    #[tokio::test]
    async fn test_blank_sections_pass_through() {
        let chunks = vec![chunk("Awards", "   ")];
        let out = humanize_sections(
            humanizer(),
            chunks.clone(),
            TransformConfig::all(),
            None,
            Duration::from_secs(10),
        )
        .await
        .unwrap();
        assert_eq!(out, chunks);
    }

    #[tokio::test]
    async fn test_failed_section_fails_the_batch() {
        let lexicon = Arc::new(Lexicon::bundled().unwrap());
        let h = Arc::new(Humanizer::new(lexicon, Arc::new(StallingTagger)));
        let chunks = vec![
            chunk("Summary", "Backend engineer."),
            chunk("Skills", "Kubernetes and Rust."),
        ];
        let err = humanize_sections(
            h,
            chunks,
            TransformConfig::default(),
            None,
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();
        match err {
            HumanizerError::SectionsFailed(titles) => assert_eq!(titles, vec!["Skills"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_chunk_json_shape() {
        let parsed: Vec<TextChunk> = serde_json::from_str(
            r#"[{"section_title": "Summary", "section_content": "Engineer."}]"#,
        )
        .unwrap();
        assert_eq!(parsed[0], chunk("Summary", "Engineer."));
    }
}
