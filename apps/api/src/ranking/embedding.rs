//! Embedding Resolver — turns skill labels into vectors comparable with resume embeddings.
//!
//! Production callers supply a `SkillEmbedder` built from the same model that
//! embedded the corpus. Without one, vectors are bootstrapped from corpus
//! statistics, which is only a weak stand-in for real semantics.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use tracing::{debug, info};

use crate::models::resume::ResumeRecord;
use crate::ranking::RankingError;

/// Resumes averaged when a skill matches no position.
const FALLBACK_SAMPLE_SIZE: usize = 10;
/// Standard deviation of the per-dimension Gaussian noise on fallback vectors.
const FALLBACK_NOISE_STD_DEV: f64 = 0.01;

/// Maps a skill label to a vector. Must be pure: no corpus access, same input same output.
pub trait SkillEmbedder: Send + Sync {
    fn embed(&self, skill: &str) -> Vec<f64>;
}

impl<F> SkillEmbedder for F
where
    F: Fn(&str) -> Vec<f64> + Send + Sync,
{
    fn embed(&self, skill: &str) -> Vec<f64> {
        self(skill)
    }
}

/// RNG for fallback noise: reproducible when seeded, OS entropy otherwise.
pub fn fallback_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Produces one vector per skill, in input order.
///
/// With an embedder, each skill is embedded independently. Without one:
/// 1. D is the first resume's vector length (`EmptyCorpus` if there is none)
/// 2. resumes whose `meta.position` contains the skill (case-insensitive) are averaged
/// 3. otherwise the first ten resumes are averaged and perturbed with N(0, 0.01) noise
///
/// Resumes whose vectors are not of length D never contribute to an average.
pub fn resolve_skill_vectors<R: Rng + ?Sized>(
    skills: &[String],
    corpus: &[ResumeRecord],
    embedder: Option<&dyn SkillEmbedder>,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>, RankingError> {
    if let Some(embedder) = embedder {
        return Ok(skills.iter().map(|skill| embedder.embed(skill)).collect());
    }

    let dimension = corpus
        .first()
        .map(|r| r.embedding_vector.len())
        .ok_or(RankingError::EmptyCorpus)?;
    info!(dimension, skills = skills.len(), "Bootstrapping skill vectors from corpus");

    let uniform: Vec<&ResumeRecord> = corpus
        .iter()
        .filter(|r| r.embedding_vector.len() == dimension)
        .collect();
    let positions: Vec<Option<String>> = uniform.iter().map(|r| r.position_lower()).collect();

    let vectors = skills
        .iter()
        .map(|skill| {
            let skill_lower = skill.to_lowercase();
            let related: Vec<&[f64]> = uniform
                .iter()
                .zip(&positions)
                .filter(|(_, position)| {
                    position
                        .as_deref()
                        .is_some_and(|p| p.contains(&skill_lower))
                })
                .map(|(r, _)| r.embedding_vector.as_slice())
                .collect();

            if related.is_empty() {
                debug!(skill = %skill, "No position matches skill; using noisy corpus mean");
                noisy_corpus_mean(&uniform, dimension, rng)
            } else {
                debug!(skill = %skill, matches = related.len(), "Averaging related resumes");
                mean_vector(&related, dimension)
            }
        })
        .collect();

    Ok(vectors)
}

fn noisy_corpus_mean<R: Rng + ?Sized>(
    uniform: &[&ResumeRecord],
    dimension: usize,
    rng: &mut R,
) -> Vec<f64> {
    let sample: Vec<&[f64]> = uniform
        .iter()
        .take(FALLBACK_SAMPLE_SIZE)
        .map(|r| r.embedding_vector.as_slice())
        .collect();

    let mut vector = mean_vector(&sample, dimension);
    for value in &mut vector {
        let noise: f64 = StandardNormal.sample(rng);
        *value += noise * FALLBACK_NOISE_STD_DEV;
    }
    vector
}

/// Element-wise arithmetic mean. All inputs must have length `dimension`.
fn mean_vector(vectors: &[&[f64]], dimension: usize) -> Vec<f64> {
    let mut sum = vec![0.0_f64; dimension];
    for vector in vectors {
        for (acc, value) in sum.iter_mut().zip(vector.iter()) {
            *acc += value;
        }
    }
    if !vectors.is_empty() {
        let n = vectors.len() as f64;
        sum.iter_mut().for_each(|acc| *acc /= n);
    }
    sum
}
