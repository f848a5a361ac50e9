//! Similarity Scorer — per-skill match percentages and a weighted aggregate for one resume.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::ranking::RankingError;

/// Per-skill importance. Any skill without an explicit entry weighs `DEFAULT_WEIGHT`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillWeights {
    weights: HashMap<String, f64>,
}

impl SkillWeights {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    /// Negative or non-finite weights are stored as 0.
    pub fn insert(&mut self, skill: impl Into<String>, weight: f64) {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self.weights.insert(skill.into(), weight);
    }

    pub fn weight_for(&self, skill: &str) -> f64 {
        self.weights
            .get(skill)
            .copied()
            .unwrap_or(Self::DEFAULT_WEIGHT)
    }
}

/// Scores for one resume against one skill list. Built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Keyed by skill name; a repeated name keeps the score of its last occurrence.
    pub skill_matches: BTreeMap<String, f64>,
    pub match_score: f64,
    /// Skills scored 0 because a vector had zero norm.
    pub zero_vector_skills: Vec<String>,
    /// Skills scored 0 because a vector held NaN or infinity.
    pub non_finite_skills: Vec<String>,
}

/// Cosine of the angle between `a` and `b`, in [-1, 1].
///
/// Each vector is divided by its largest absolute component first, so every
/// term stays in [-1, 1] and the result does not depend on magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64], skill: &str) -> Result<f64, RankingError> {
    if a.len() != b.len() {
        return Err(RankingError::InvalidSkillVector {
            skill: skill.to_string(),
            expected: a.len(),
            actual: b.len(),
        });
    }
    if a.iter().chain(b).any(|x| !x.is_finite()) {
        return Err(RankingError::NonFiniteVector {
            skill: skill.to_string(),
        });
    }

    let scale_a = max_abs(a);
    let scale_b = max_abs(b);
    if scale_a == 0.0 || scale_b == 0.0 {
        return Err(RankingError::ZeroVector {
            skill: skill.to_string(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

/// Maps a cosine similarity to a percentage: negatives clamp to 0, then
/// square-root scaling spreads out the low end. NaN scores 0.
pub fn similarity_to_percentage(cos: f64) -> f64 {
    if !cos.is_finite() {
        return 0.0;
    }
    (cos.max(0.0).sqrt() * 100.0).clamp(0.0, 100.0)
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scores one resume vector against `skill_vectors`, paired positionally with `skills`.
///
/// Algorithm:
/// 1. cos = cosine(resume, skill); a zero-norm or non-finite vector scores 0 and is recorded
/// 2. percentage = clamp(sqrt(max(0, cos)) × 100, 0, 100)
/// 3. match_score = Σ(percentage × weight) / Σ(weight), 0 when there are no skills
///
/// Both per-skill and aggregate scores are rounded to one decimal; the aggregate
/// is computed from the unrounded percentages.
pub fn compute_similarity(
    resume_vector: &[f64],
    skill_vectors: &[Vec<f64>],
    skills: &[String],
    weights: &SkillWeights,
) -> Result<MatchResult, RankingError> {
    let mut skill_matches = BTreeMap::new();
    let mut zero_vector_skills = Vec::new();
    let mut non_finite_skills = Vec::new();
    let mut total_weighted = 0.0_f64;
    let mut total_weight = 0.0_f64;

    for (skill_vector, skill) in skill_vectors.iter().zip(skills) {
        let percentage = match cosine_similarity(resume_vector, skill_vector, skill) {
            Ok(cos) => similarity_to_percentage(cos),
            Err(RankingError::ZeroVector { .. }) => {
                zero_vector_skills.push(skill.clone());
                0.0
            }
            Err(RankingError::NonFiniteVector { .. }) => {
                non_finite_skills.push(skill.clone());
                0.0
            }
            Err(e) => return Err(e),
        };

        skill_matches.insert(skill.clone(), round_to_tenth(percentage));

        let weight = weights.weight_for(skill);
        total_weighted += percentage * weight;
        total_weight += weight;
    }

    let match_score = if total_weight > 0.0 {
        round_to_tenth((total_weighted / total_weight).clamp(0.0, 100.0))
    } else {
        0.0
    };

    Ok(MatchResult {
        skill_matches,
        match_score,
        zero_vector_skills,
        non_finite_skills,
    })
}
