mod config;
mod errors;
mod ingest;
mod matching;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ingest::FileTextExtractor;
use crate::matching::scorer::WeightedSkillScorer;
use crate::routes::build_router;
use crate::skills::extractor::SkillExtractor;
use crate::skills::vocabulary::{load_tables, CriticalSkills, SkillVocabulary};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed overrides)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFit API v{}", env!("CARGO_PKG_VERSION"));

    // Skill tables are loaded once and never change afterwards
    let (vocabulary, critical) = match &config.skill_vocabulary_path {
        Some(path) => load_tables(path)
            .with_context(|| format!("Failed to load skill vocabulary from {}", path.display()))?,
        None => (SkillVocabulary::built_in()?, CriticalSkills::built_in()),
    };
    if vocabulary.is_empty() {
        anyhow::bail!("Skill vocabulary is empty");
    }
    if critical.is_empty() {
        warn!("Critical skill set is empty; every skill will carry the same weight");
    }
    info!(
        skills = vocabulary.len(),
        variants = vocabulary.variant_count(),
        critical = critical.len(),
        "Skill vocabulary loaded"
    );

    let extractor = SkillExtractor::new(vocabulary, config.extractor);
    let settings = extractor.settings();
    info!(
        "Extractor settings: fuzzy threshold {}, {} years per date range",
        settings.fuzzy_threshold, settings.years_per_date_range
    );

    let scorer = WeightedSkillScorer::new(critical, config.weights);
    info!("Scoring weights: {:?}", scorer.weights());

    let state = AppState {
        config: config.clone(),
        extractor: Arc::new(extractor),
        scorer: Arc::new(scorer),
        text_extractor: Arc::new(FileTextExtractor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
