use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::ranking::RankingError;

/// Display metadata carried alongside a resume. `name` and `position` are the
/// only keys the ranker reads; everything else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A pre-embedded resume. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(alias = "resume_id")]
    pub unique_id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub parsed: Map<String, Value>,
    #[serde(alias = "embedding")]
    pub embedding_vector: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: ResumeMeta,
}

impl ResumeRecord {
    /// Lowercased position, if the record has one.
    pub fn position_lower(&self) -> Option<String> {
        self.meta.position.as_deref().map(str::to_lowercase)
    }
}

/// A corpus element that failed boundary validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub unique_id: Option<String>,
    pub reason: String,
}

/// Validated resumes plus everything that was quarantined while loading them.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub records: Vec<ResumeRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Reads and validates a corpus file (one JSON array of resume records).
pub fn load_corpus(path: &Path) -> Result<Corpus, RankingError> {
    let raw = std::fs::read_to_string(path)?;
    let corpus = parse_corpus(&raw)?;
    info!(
        path = %path.display(),
        loaded = corpus.records.len(),
        rejected = corpus.rejected.len(),
        "Loaded resume corpus"
    );
    Ok(corpus)
}

/// Parses a corpus document. Malformed elements are quarantined with a reason
/// instead of failing the whole load; only a non-array document is fatal.
pub fn parse_corpus(raw: &str) -> Result<Corpus, RankingError> {
    let elements: Vec<Value> = serde_json::from_str(raw)?;
    Ok(validate_records(elements))
}

/// Validates already-parsed corpus elements, quarantining the ones that fail.
pub fn validate_records(elements: Vec<Value>) -> Corpus {
    let mut corpus = Corpus::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, element) in elements.into_iter().enumerate() {
        let claimed_id = element
            .get("unique_id")
            .or_else(|| element.get("resume_id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let reason = match serde_json::from_value::<ResumeRecord>(element) {
            Ok(record) => match check_record(&record, &seen) {
                None => {
                    seen.insert(record.unique_id.clone());
                    corpus.records.push(record);
                    continue;
                }
                Some(reason) => reason,
            },
            Err(e) => format!("malformed record: {e}"),
        };

        warn!(index, unique_id = ?claimed_id, %reason, "Quarantined resume record");
        corpus.rejected.push(RejectedRecord {
            index,
            unique_id: claimed_id,
            reason,
        });
    }

    corpus
}

fn check_record(record: &ResumeRecord, seen: &HashSet<String>) -> Option<String> {
    if record.unique_id.trim().is_empty() {
        return Some("empty unique_id".to_string());
    }
    if seen.contains(&record.unique_id) {
        return Some(format!("duplicate unique_id '{}'", record.unique_id));
    }
    if record.embedding_vector.is_empty() {
        return Some("empty embedding_vector".to_string());
    }
    if record.embedding_vector.iter().any(|x| !x.is_finite()) {
        return Some("embedding_vector contains non-finite values".to_string());
    }
    None
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
