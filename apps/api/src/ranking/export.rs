//! Exporter — writes a ranking to disk as a pretty-printed JSON array.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::ranking::engine::RankedRecord;
use crate::ranking::RankingError;

/// Writes `ranked` to `path`, preserving order.
///
/// The document is written to a temp file in the destination directory, synced,
/// then renamed over `path`. A failed export leaves any previous file untouched.
/// The result is readable by other users (0644 on Unix), like a plain `fs::write`.
pub fn save_ranking(ranked: &[RankedRecord], path: &Path) -> Result<(), RankingError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let body = serde_json::to_vec_pretty(ranked)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&body)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // NamedTempFile is created 0600.
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| RankingError::Io(e.error))?;

    info!(path = %path.display(), records = ranked.len(), "Saved ranked resumes");
    Ok(())
}

/// Reads back a file written by `save_ranking`.
pub fn load_ranking(path: &Path) -> Result<Vec<RankedRecord>, RankingError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeMeta;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn make_record(id: &str, score: f64, matches: &[(&str, f64)]) -> RankedRecord {
        let mut extra = serde_json::Map::new();
        extra.insert("email".to_string(), json!(format!("{id}@example.com")));
        RankedRecord {
            unique_id: id.to_string(),
            match_score: score,
            skill_matches: matches
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            meta: ResumeMeta {
                name: Some(format!("Candidate {id}")),
                position: None,
                extra,
            },
        }
    }

    #[test]
    fn test_round_trip_preserves_order_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranked_resumes.json");
        let ranked = vec![
            make_record("b", 91.3, &[("Python", 95.2), ("SQL", 87.4)]),
            make_record("a", 91.3, &[("Python", 90.0), ("SQL", 92.6)]),
            make_record("c", 12.7, &[("Python", 0.0), ("SQL", 25.4)]),
        ];

        save_ranking(&ranked, &path).unwrap();
        let loaded = load_ranking(&path).unwrap();
        assert_eq!(loaded, ranked);
    }

    #[test]
    fn test_output_shape_uses_record_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_ranking(&[make_record("a", 50.0, &[("AWS", 50.0)])], &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let first = &value[0];
        assert_eq!(first["unique_id"], "a");
        assert_eq!(first["match_score"], 50.0);
        assert_eq!(first["skill_matches"]["AWS"], 50.0);
        assert_eq!(first["meta"]["name"], "Candidate a");
        assert_eq!(first["meta"]["email"], "a@example.com");
    }

    #[test]
    fn test_empty_ranking_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        save_ranking(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale").unwrap();
        save_ranking(&[make_record("a", 1.0, &[])], &path).unwrap();
        assert_eq!(load_ranking(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_persist_leaves_destination_and_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the destination makes the final rename fail.
        let path = dir.path().join("out.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("previous.json"), "previous").unwrap();

        let err = save_ranking(&[make_record("a", 1.0, &[])], &path).unwrap_err();
        assert!(matches!(err, RankingError::Io(_)));

        assert_eq!(
            std::fs::read_to_string(path.join("previous.json")).unwrap(),
            "previous"
        );
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_exported_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_ranking(&[], &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.json");
        let err = save_ranking(&[], &path).unwrap_err();
        assert!(matches!(err, RankingError::Io(_)));
        assert!(!path.exists());
    }
}
