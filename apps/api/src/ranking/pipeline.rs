//! Batch ranking workflow: job description → skills → corpus → ranking → export,
//! with every step recorded by a `RankingReporter`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use crate::extraction::extract_fields;
use crate::models::resume::{load_corpus, RejectedRecord};
use crate::ranking::embedding::{fallback_rng, SkillEmbedder};
use crate::ranking::engine::{rank_resumes, RankOptions, RankedRecord};
use crate::ranking::export::save_ranking;
use crate::ranking::report::RankingReporter;
use crate::ranking::RankingWarning;

/// Where the required skills come from.
#[derive(Debug, Clone)]
pub enum SkillSource {
    /// A text file holding a job posting; skills are extracted from it.
    JobDescriptionFile(PathBuf),
    /// Skills supplied directly, in ranking order.
    Skills(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct RankingJob {
    pub skills: SkillSource,
    pub corpus_path: PathBuf,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    pub options: RankOptions,
    pub noise_seed: Option<u64>,
    pub top_n: usize,
}

#[derive(Debug, Clone)]
pub struct RankingSummary {
    pub run_id: Uuid,
    pub skills: Vec<String>,
    pub ranked: Vec<RankedRecord>,
    pub warnings: Vec<RankingWarning>,
    pub rejected: Vec<RejectedRecord>,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
}

/// Runs one ranking job end to end.
///
/// The run log is opened first and always flushed, even when a step fails; a
/// failure is written as the last log line before it is returned.
pub fn run_ranking_job(
    job: &RankingJob,
    embedder: Option<&dyn SkillEmbedder>,
) -> Result<RankingSummary> {
    let mut reporter = RankingReporter::open(&job.log_path)
        .with_context(|| format!("Failed to open ranking log {}", job.log_path.display()))?;
    let run_id = reporter.run_id();

    let outcome = execute(job, embedder, &mut reporter);
    if let Err(e) = &outcome {
        reporter.failure(format!("{e:#}"));
    }
    let log_result = reporter.finish();

    let (skills, ranked, warnings, rejected) = outcome?;
    let log_path = log_result.context("Failed to write ranking log")?;

    Ok(RankingSummary {
        run_id,
        skills,
        ranked,
        warnings,
        rejected,
        output_path: job.output_path.clone(),
        log_path,
    })
}

type JobOutcome = (
    Vec<String>,
    Vec<RankedRecord>,
    Vec<RankingWarning>,
    Vec<RejectedRecord>,
);

fn execute(
    job: &RankingJob,
    embedder: Option<&dyn SkillEmbedder>,
    reporter: &mut RankingReporter,
) -> Result<JobOutcome> {
    let skills = match &job.skills {
        SkillSource::Skills(skills) => skills.clone(),
        SkillSource::JobDescriptionFile(path) => {
            let job_desc = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read job description {}", path.display()))?;
            let job_desc = job_desc.trim();
            reporter.line(format_args!("Job description: '{job_desc}'"));
            if job_desc.is_empty() {
                bail!("Empty job description file");
            }
            extract_fields(job_desc)?.skills
        }
    };
    reporter.line(format_args!("Extracted skills: {skills:?}"));

    let corpus = load_corpus(&job.corpus_path)
        .with_context(|| format!("Failed to load corpus {}", job.corpus_path.display()))?;
    reporter.line(format_args!("Loaded {} resumes", corpus.records.len()));
    if !corpus.rejected.is_empty() {
        reporter.line(format_args!(
            "Quarantined {} malformed records",
            corpus.rejected.len()
        ));
        for rejected in &corpus.rejected {
            reporter.line(format_args!(
                "   record {}: {}",
                rejected.index, rejected.reason
            ));
        }
    }

    let mut rng = fallback_rng(job.noise_seed);
    let ranking = rank_resumes(&corpus.records, &skills, embedder, &job.options, &mut rng)?;
    reporter.line(format_args!("Ranked {} resumes", ranking.records.len()));
    for warning in &ranking.warnings {
        reporter.line(format_args!("Warning: {warning}"));
    }

    save_ranking(&ranking.records, &job.output_path)
        .with_context(|| format!("Failed to save ranking {}", job.output_path.display()))?;
    reporter.line(format_args!(
        "Saved ranked resumes to {}",
        job.output_path.display()
    ));

    reporter.top_matches(&ranking.records, job.top_n);

    Ok((skills, ranking.records, ranking.warnings, corpus.rejected))
}
