//! Rewrites academic or resume prose so it reads less machine-generated.
//!
//! Contractions are always expanded; synonym substitution, passive voice and
//! transition phrases are switched per call through [`TransformConfig`].

pub mod config;
pub mod errors;
pub mod lexical;
pub mod lexicon;
pub mod pipeline;
pub mod sanitize;
pub mod sections;
pub mod syntactic;
pub mod tagging;
pub mod text;

pub use errors::HumanizerError;
pub use lexicon::Lexicon;
pub use pipeline::{humanize_with_timeout, Humanizer, TransformConfig};
pub use sections::{humanize_sections, TextChunk};
