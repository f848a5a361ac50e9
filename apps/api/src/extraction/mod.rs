//! Job field extraction — pulls title, skills, experience and location out of a
//! free-text job posting with plain pattern matching.
//!
//! `AppState` holds an `Arc<dyn JobExtractor>` so a smarter backend can replace
//! `PatternJobExtractor` without touching handlers.

pub mod handlers;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Skills recognised in postings, in the order they are reported.
pub const KNOWN_SKILLS: &[&str] = &[
    "Python",
    "cloud computing",
    "machine learning",
    "JavaScript",
    "Java",
    "C++",
    "SQL",
    "AWS",
    "Azure",
];

const DEFAULT_TITLE: &str = "Software Engineer";
const DEFAULT_ENGINEER_SKILLS: &[&str] = &["Python", "cloud computing"];
const DEFAULT_EXPERIENCE: &str = "3+ years";
const DEFAULT_LOCATION: &str = "Remote";

static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([\w\s]+?)\s(?:needed|required|with)").unwrap());
static RE_EXPERIENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+\+?\s*(?:year|yr)s?(?:\s+of\s+experience)?)").unwrap()
});
static RE_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)location\s*:\s*([\w\s,]+)").unwrap());
// Token boundaries are non-word characters rather than \b so "C++" matches.
static RE_SKILLS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    KNOWN_SKILLS
        .iter()
        .map(|skill| {
            let pattern = format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(skill));
            (*skill, Regex::new(&pattern).unwrap())
        })
        .collect()
});

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Empty job description")]
    EmptyDescription,
}

/// Structured fields pulled from a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub location: String,
}

/// Extracts job fields from `text`. Every field has a fallback, so only blank
/// input fails.
pub fn extract_fields(text: &str) -> Result<JobDescription, ExtractionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::EmptyDescription);
    }

    let title = RE_TITLE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let mut skills: Vec<String> = RE_SKILLS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(skill, _)| skill.to_string())
        .collect();

    if skills.is_empty() && title.to_lowercase().contains("engineer") {
        skills = DEFAULT_ENGINEER_SKILLS
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    let experience = RE_EXPERIENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_EXPERIENCE.to_string());

    let location = RE_LOCATION
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    let fields = JobDescription {
        title,
        skills,
        experience,
        location,
    };
    debug!(?fields, "Extracted job fields");
    Ok(fields)
}

/// Turns a job posting into structured fields. Carried in `AppState` as
/// `Arc<dyn JobExtractor>`.
#[async_trait]
pub trait JobExtractor: Send + Sync {
    async fn extract(&self, job_description: &str) -> Result<JobDescription, ExtractionError>;
}

/// Regex-based extractor. Deterministic, no external calls.
pub struct PatternJobExtractor;

#[async_trait]
impl JobExtractor for PatternJobExtractor {
    async fn extract(&self, job_description: &str) -> Result<JobDescription, ExtractionError> {
        extract_fields(job_description)
    }
}
