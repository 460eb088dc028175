use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::scorer::ScoringWeights;
use crate::skills::extractor::ExtractorSettings;

/// 16 MiB, the largest résumé upload accepted.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; a malformed value fails start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// JSON file replacing the built-in skill tables.
    pub skill_vocabulary_path: Option<PathBuf>,
    pub extractor: ExtractorSettings,
    pub weights: ScoringWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            skill_vocabulary_path: None,
            extractor: ExtractorSettings::default(),
            weights: ScoringWeights::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let weights = ScoringWeights {
            skills: env_or("SKILLS_WEIGHT", defaults.weights.skills)?,
            keywords: env_or("KEYWORDS_WEIGHT", defaults.weights.keywords)?,
            experience: env_or("EXPERIENCE_WEIGHT", defaults.weights.experience)?,
            education: env_or("EDUCATION_WEIGHT", defaults.weights.education)?,
            formatting: env_or("FORMATTING_WEIGHT", defaults.weights.formatting)?,
        };
        weights
            .validate()
            .context("Scoring weight overrides are invalid")?;

        Ok(Config {
            port: env_or("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            skill_vocabulary_path: std::env::var_os("SKILL_VOCABULARY_PATH").map(PathBuf::from),
            extractor: ExtractorSettings {
                fuzzy_threshold: env_or("FUZZY_THRESHOLD", defaults.extractor.fuzzy_threshold)?,
                years_per_date_range: env_or(
                    "YEARS_PER_DATE_RANGE",
                    defaults.extractor.years_per_date_range,
                )?,
            },
            weights,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{value}'")),
    }
}
