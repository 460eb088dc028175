use std::sync::Arc;

use crate::config::Config;
use crate::ingest::DocumentTextExtractor;
use crate::matching::scorer::JobScorer;
use crate::skills::extractor::SkillExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Vocabulary-backed extractor, built once from the built-in or file tables.
    pub extractor: Arc<SkillExtractor>,
    /// Pluggable match scorer. Default: WeightedSkillScorer.
    pub scorer: Arc<dyn JobScorer>,
    pub text_extractor: Arc<dyn DocumentTextExtractor>,
}

#[cfg(test)]
pub fn test_state() -> AppState {
    use crate::ingest::FileTextExtractor;
    use crate::matching::scorer::WeightedSkillScorer;
    use crate::skills::vocabulary::{CriticalSkills, SkillVocabulary};

    let config = Config::default();
    AppState {
        extractor: Arc::new(SkillExtractor::new(
            SkillVocabulary::built_in().unwrap(),
            config.extractor,
        )),
        scorer: Arc::new(WeightedSkillScorer::new(
            CriticalSkills::built_in(),
            config.weights,
        )),
        text_extractor: Arc::new(FileTextExtractor),
        config,
    }
}
