//! Ranking Engine — scores every resume against one skill list and sorts the results.

use std::collections::BTreeMap;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::resume::{ResumeMeta, ResumeRecord};
use crate::ranking::embedding::{resolve_skill_vectors, SkillEmbedder};
use crate::ranking::similarity::{compute_similarity, SkillWeights};
use crate::ranking::{RankingError, RankingWarning};

/// What to do with a resume whose vector length differs from the corpus dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionPolicy {
    /// Skip the resume, record a warning, keep ranking the rest.
    #[default]
    Skip,
    /// Fail the whole ranking with `DimensionMismatch`.
    Strict,
}

impl FromStr for DimensionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(DimensionPolicy::Skip),
            "strict" => Ok(DimensionPolicy::Strict),
            other => Err(format!("unknown dimension policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    pub dimension_policy: DimensionPolicy,
    pub weights: SkillWeights,
}

/// One resume's place in a ranking. Holds no reference back to the source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub unique_id: String,
    pub match_score: f64,
    pub skill_matches: BTreeMap<String, f64>,
    pub meta: ResumeMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    /// Descending by `match_score`; ties keep input order.
    pub records: Vec<RankedRecord>,
    pub warnings: Vec<RankingWarning>,
}

/// Ranks `resumes` by how well they match `skills`.
///
/// Skill vectors are resolved once and shared across all resumes. The corpus
/// dimension is the first resume's vector length; every skill vector must match
/// it. Resumes that do not are handled per `options.dimension_policy`.
pub fn rank_resumes<R: Rng + ?Sized>(
    resumes: &[ResumeRecord],
    skills: &[String],
    embedder: Option<&dyn SkillEmbedder>,
    options: &RankOptions,
    rng: &mut R,
) -> Result<Ranking, RankingError> {
    let skill_vectors = resolve_skill_vectors(skills, resumes, embedder, rng)?;

    let Some(dimension) = resumes.first().map(|r| r.embedding_vector.len()) else {
        return Ok(Ranking::default());
    };

    for (skill, vector) in skills.iter().zip(&skill_vectors) {
        if vector.len() != dimension {
            return Err(RankingError::InvalidSkillVector {
                skill: skill.clone(),
                expected: dimension,
                actual: vector.len(),
            });
        }
    }

    let mut records = Vec::with_capacity(resumes.len());
    let mut warnings = Vec::new();

    for resume in resumes {
        let actual = resume.embedding_vector.len();
        if actual != dimension {
            if options.dimension_policy == DimensionPolicy::Strict {
                return Err(RankingError::DimensionMismatch {
                    resume_id: resume.unique_id.clone(),
                    expected: dimension,
                    actual,
                });
            }
            warn!(
                resume_id = %resume.unique_id,
                expected = dimension,
                actual,
                "Skipping resume with mismatched embedding dimension"
            );
            warnings.push(RankingWarning::DimensionMismatch {
                resume_id: resume.unique_id.clone(),
                expected: dimension,
                actual,
            });
            continue;
        }

        let result = compute_similarity(
            &resume.embedding_vector,
            &skill_vectors,
            skills,
            &options.weights,
        )?;

        for skill in result.zero_vector_skills {
            warn!(resume_id = %resume.unique_id, skill = %skill, "Zero-norm vector; scored 0");
            warnings.push(RankingWarning::ZeroVector {
                resume_id: resume.unique_id.clone(),
                skill,
            });
        }
        for skill in result.non_finite_skills {
            warn!(resume_id = %resume.unique_id, skill = %skill, "Non-finite vector; scored 0");
            warnings.push(RankingWarning::NonFiniteVector {
                resume_id: resume.unique_id.clone(),
                skill,
            });
        }

        records.push(RankedRecord {
            unique_id: resume.unique_id.clone(),
            match_score: result.match_score,
            skill_matches: result.skill_matches,
            meta: resume.meta.clone(),
        });
    }

    // Vec::sort_by is stable: equal scores keep their input order.
    records.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

    info!(
        ranked = records.len(),
        skipped = resumes.len() - records.len(),
        skills = skills.len(),
        "Ranked resumes"
    );

    Ok(Ranking { records, warnings })
}
