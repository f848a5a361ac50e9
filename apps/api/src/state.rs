use std::sync::Arc;

use crate::config::Config;
use crate::extraction::{JobExtractor, PatternJobExtractor};
use crate::ranking::SkillEmbedder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable job extractor. Default: PatternJobExtractor.
    pub job_extractor: Arc<dyn JobExtractor>,
    /// Skill embedder matching the corpus model. `None` bootstraps skill vectors
    /// from corpus statistics.
    pub embedder: Option<Arc<dyn SkillEmbedder>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            job_extractor: Arc::new(PatternJobExtractor),
            embedder: None,
        }
    }
}
