use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use humanizer::config::Config;
use humanizer::{humanize_sections, humanize_with_timeout, Humanizer, Lexicon, TextChunk};

/// Flags override the matching `HUMANIZER_*` variables.
#[derive(Parser, Debug)]
#[command(name = "humanizer")]
#[command(about = "Rewrite academic or resume prose so it reads less machine-generated")]
#[command(version)]
struct Args {
    /// Text files, or `.json` lists of sections; stdin when none are given
    files: Vec<PathBuf>,

    /// Replace adjectives and adverbs with synonyms
    #[arg(long)]
    synonyms: bool,

    /// Turn eligible sentences into passive voice
    #[arg(long)]
    passive: bool,

    /// Open sentences with academic transitions
    #[arg(long)]
    transitions: bool,

    /// Enable every optional transform
    #[arg(long)]
    all: bool,

    /// Chance an eligible sentence is passivized (0 to 1)
    #[arg(long, value_parser = parse_probability)]
    p_passive: Option<f64>,

    /// Chance a sentence gets a transition (0 to 1)
    #[arg(long, value_parser = parse_probability)]
    p_transition: Option<f64>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Lexicon file: the JSON format, or an Open English WordNet `.xml` release
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Per-document time limit in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        config.synonym_replacement |= self.synonyms || self.all;
        config.passive_voice |= self.passive || self.all;
        config.academic_transitions |= self.transitions || self.all;
        if let Some(p) = self.p_passive {
            config.p_passive = p;
        }
        if let Some(p) = self.p_transition {
            config.p_transition = p;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.lexicon.is_some() {
            config.lexicon_path = self.lexicon.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
    }
}

fn parse_probability(raw: &str) -> Result<f64, String> {
    let p: f64 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} is not between 0 and 1"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (fails on malformed env vars)
    let mut config = Config::from_env()?;
    args.apply(&mut config);

    // Logs go to stderr so stdout carries only the humanized text
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting humanizer v{}", env!("CARGO_PKG_VERSION"));

    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::from_path(path)
            .with_context(|| format!("Failed to load lexicon from {}", path.display()))?,
        None => Lexicon::bundled().context("Bundled lexicon is invalid")?,
    };
    info!(
        "Lexicon ready: {} synsets, {} verbs",
        lexicon.synset_count(),
        lexicon.verb_count()
    );

    let humanizer = Arc::new(Humanizer::with_lexicon(Arc::new(lexicon)));
    let transform = config.transform_config();
    info!("Transforms: {:?}", transform);

    if args.files.is_empty() {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("Failed to read stdin")?;
        let output = humanize_with_timeout(
            humanizer.clone(),
            input,
            transform,
            config.seed,
            config.timeout(),
        )
        .await?;
        println!("{output}");
        return Ok(());
    }

    for path in &args.files {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if is_json(path) {
            let chunks: Vec<TextChunk> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a list of sections", path.display()))?;
            let humanized = humanize_sections(
                humanizer.clone(),
                chunks,
                transform,
                config.seed,
                config.timeout(),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&humanized)?);
        } else {
            let output = humanize_with_timeout(
                humanizer.clone(),
                raw,
                transform,
                config.seed,
                config.timeout(),
            )
            .await?;
            println!("{output}");
        }
    }

    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
