// Resume ranking engine.
// Implements: skill-vector resolution, cosine scoring, stable ranking, atomic export.
// Everything in here is synchronous; HTTP callers wrap it in spawn_blocking.

pub mod embedding;
pub mod engine;
pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod report;
pub mod similarity;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use embedding::{resolve_skill_vectors, SkillEmbedder};
pub use engine::{rank_resumes, DimensionPolicy, RankOptions, RankedRecord, Ranking};
pub use export::{load_ranking, save_ranking};
pub use similarity::{compute_similarity, MatchResult, SkillWeights};

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("No resumes found to determine embedding dimension")]
    EmptyCorpus,

    #[error("Resume '{resume_id}' has embedding dimension {actual}, expected {expected}")]
    DimensionMismatch {
        resume_id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cosine similarity is undefined for a zero-norm vector (skill '{skill}')")]
    ZeroVector { skill: String },

    #[error("Cosine similarity is undefined for a vector with NaN or infinite values (skill '{skill}')")]
    NonFiniteVector { skill: String },

    #[error("Skill '{skill}' resolved to a vector of dimension {actual}, expected {expected}")]
    InvalidSkillVector {
        skill: String,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A recoverable problem hit during a ranking call. Recorded and logged,
/// never fatal under the default policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankingWarning {
    /// Resume skipped because its vector length disagrees with the corpus.
    DimensionMismatch {
        resume_id: String,
        expected: usize,
        actual: usize,
    },
    /// Skill scored 0 for this resume because one of the vectors has zero norm.
    ZeroVector { resume_id: String, skill: String },
    /// Skill scored 0 for this resume because its vector held NaN or infinity.
    NonFiniteVector { resume_id: String, skill: String },
}

impl std::fmt::Display for RankingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingWarning::DimensionMismatch {
                resume_id,
                expected,
                actual,
            } => write!(
                f,
                "skipped resume '{resume_id}': embedding dimension {actual}, expected {expected}"
            ),
            RankingWarning::ZeroVector { resume_id, skill } => write!(
                f,
                "resume '{resume_id}' scored 0 for '{skill}': zero-norm vector"
            ),
            RankingWarning::NonFiniteVector { resume_id, skill } => write!(
                f,
                "resume '{resume_id}' scored 0 for '{skill}': non-finite vector"
            ),
        }
    }
}
