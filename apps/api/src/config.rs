use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::ranking::engine::DimensionPolicy;

/// Application configuration loaded from environment variables.
/// Every value has a default so the service starts against a local corpus file.
#[derive(Debug, Clone)]
pub struct Config {
    pub corpus_path: PathBuf,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    pub dimension_policy: DimensionPolicy,
    /// Seeds the fallback skill-vector noise. `None` draws from OS entropy.
    pub noise_seed: Option<u64>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            corpus_path: env_or("CORPUS_PATH", "final_finale.json").into(),
            output_path: env_or("RANKING_OUTPUT_PATH", "ranked_resumes.json").into(),
            log_path: env_or("RANKING_LOG_PATH", "resume_ranking.log").into(),
            dimension_policy: env_or("DIMENSION_POLICY", "skip")
                .parse::<DimensionPolicy>()
                .map_err(anyhow::Error::msg)
                .context("DIMENSION_POLICY must be 'skip' or 'strict'")?,
            noise_seed: std::env::var("FALLBACK_NOISE_SEED")
                .ok()
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("FALLBACK_NOISE_SEED must be an unsigned integer")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            corpus_path: "final_finale.json".into(),
            output_path: "ranked_resumes.json".into(),
            log_path: "resume_ranking.log".into(),
            dimension_policy: DimensionPolicy::default(),
            noise_seed: None,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
