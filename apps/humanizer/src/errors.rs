use thiserror::Error;

/// Library-level error type.
/// `humanize` itself never returns one: per-sentence failures degrade to passthrough.
/// These surface from resource loading, the tagger seam and the async wrappers.
#[derive(Debug, Error)]
pub enum HumanizerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lexicon parse error: {0}")]
    LexiconParse(#[from] serde_json::Error),

    #[error("WordNet parse error: {0}")]
    WordNetParse(#[from] quick_xml::de::DeError),

    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("Tagging failed: {0}")]
    Tagging(String),

    #[error("Humanization timed out after {limit:?}")]
    Timeout { limit: std::time::Duration },

    #[error("Humanization task failed: {0}")]
    Task(String),

    #[error("Failed to humanize sections: {}", .0.join(", "))]
    SectionsFailed(Vec<String>),
}

impl HumanizerError {
    /// True for errors caused by a single unit of text rather than by resources.
    /// The pipeline recovers from these by passing the unit through unchanged.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HumanizerError::Tagging(_))
    }
}
