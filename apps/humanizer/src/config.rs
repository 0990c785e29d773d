use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::pipeline::{TransformConfig, DEFAULT_P_PASSIVE, DEFAULT_P_TRANSITION};

/// Process configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub synonym_replacement: bool,
    pub passive_voice: bool,
    pub academic_transitions: bool,
    pub p_passive: f64,
    pub p_transition: f64,
    pub seed: Option<u64>,
    pub lexicon_path: Option<PathBuf>,
    pub timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = match lookup("HUMANIZER_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("HUMANIZER_TIMEOUT_SECS must be a whole number of seconds")?,
            None => 30,
        };
        if timeout_secs == 0 {
            bail!("HUMANIZER_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            synonym_replacement: env_bool(&lookup, "HUMANIZER_SYNONYMS")?,
            passive_voice: env_bool(&lookup, "HUMANIZER_PASSIVE")?,
            academic_transitions: env_bool(&lookup, "HUMANIZER_TRANSITIONS")?,
            p_passive: env_probability(&lookup, "HUMANIZER_P_PASSIVE", DEFAULT_P_PASSIVE)?,
            p_transition: env_probability(&lookup, "HUMANIZER_P_TRANSITION", DEFAULT_P_TRANSITION)?,
            seed: lookup("HUMANIZER_SEED")
                .map(|raw| raw.trim().parse::<u64>())
                .transpose()
                .context("HUMANIZER_SEED must be an unsigned integer")?,
            lexicon_path: lookup("HUMANIZER_LEXICON_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            timeout_secs,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig {
            synonym_replacement: self.synonym_replacement,
            passive_voice: self.passive_voice,
            academic_transitions: self.academic_transitions,
            p_passive: self.p_passive,
            p_transition: self.p_transition,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(false);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}

fn env_probability(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f64,
) -> Result<f64> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let p = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{key} must be a number"))?;
    if !(0.0..=1.0).contains(&p) {
        bail!("{key} must be between 0 and 1, got {p}");
    }
    Ok(p)
}
