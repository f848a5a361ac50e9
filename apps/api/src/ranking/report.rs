//! Run reporter — a human-readable log of one ranking run.
//!
//! Opened before ranking, closed with `finish` afterwards whether the run
//! succeeded or not. Every line is mirrored to `tracing`.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::ranking::engine::RankedRecord;

pub struct RankingReporter {
    run_id: Uuid,
    path: PathBuf,
    writer: BufWriter<File>,
    write_error: Option<io::Error>,
}

impl RankingReporter {
    /// Creates (or truncates) the log file at `path`.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let run_id = Uuid::new_v4();
        let mut reporter = RankingReporter {
            run_id,
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            write_error: None,
        };
        reporter.line(format_args!("Starting resume ranking workflow (run {run_id})"));
        Ok(reporter)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Appends one timestamped line. The first write failure is kept and
    /// returned from `finish`; later lines are still mirrored to tracing.
    pub fn line(&mut self, message: impl Display) {
        let message = message.to_string();
        info!(run_id = %self.run_id, "{message}");

        if self.write_error.is_some() {
            return;
        }
        let stamp = Utc::now().to_rfc3339();
        if let Err(e) = writeln!(self.writer, "[{stamp}] {message}") {
            self.write_error = Some(e);
        }
    }

    /// Writes the top `n` records with their per-skill breakdown.
    pub fn top_matches(&mut self, records: &[RankedRecord], n: usize) {
        self.line(format_args!("Top {} matching resumes:", n.min(records.len())));
        for (i, record) in records.iter().take(n).enumerate() {
            self.line(format_top_match(i + 1, record));
            self.line(format_args!(
                "   Individual skill matches: {}",
                format_skill_matches(record)
            ));
        }
    }

    pub fn failure(&mut self, error: impl Display) {
        self.line(format_args!("Error in resume ranking: {error}"));
    }

    /// Flushes the log. Returns the path written, or the first write error.
    pub fn finish(mut self) -> io::Result<PathBuf> {
        if let Some(e) = self.write_error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.path)
    }
}

/// `"1. Ada Lovelace (Backend Engineer) - Match Score: 92.4%"`
pub fn format_top_match(rank: usize, record: &RankedRecord) -> String {
    let name = record.meta.name.as_deref().unwrap_or("Unnamed");
    let position = record
        .meta
        .position
        .as_deref()
        .unwrap_or("Unknown position");
    format!(
        "{rank}. {name} ({position}) - Match Score: {:.1}%",
        record.match_score
    )
}

pub fn format_skill_matches(record: &RankedRecord) -> String {
    record
        .skill_matches
        .iter()
        .map(|(skill, score)| format!("{skill}: {score:.1}"))
        .collect::<Vec<_>>()
        .join(", ")
}
