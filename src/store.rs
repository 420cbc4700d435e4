use crate::error::{Bfi2Error, Result};
use crate::survey::responses::{ResponseFile, TIMESTAMP_FORMAT};
use crate::types::ScoredProfile;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub responses: PathBuf,
    pub scored: PathBuf,
    pub latest: Option<(PathBuf, PathBuf)>,
}

/// Reduces a persona label to characters safe in a file name.
pub fn file_stem(persona: &str) -> String {
    let stem = persona
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();
    if stem.is_empty() {
        "unknown".to_string()
    } else {
        stem
    }
}

/// Writes the response record and its scored profile side by side, stamped
/// with the record's timestamp, plus undated "latest" copies when asked.
pub fn write_run(
    results_dir: &Path,
    record: &ResponseFile,
    profile: &ScoredProfile,
    write_latest: bool,
) -> Result<RunPaths> {
    fs::create_dir_all(results_dir).map_err(Bfi2Error::Io)?;

    let stem = file_stem(profile.persona());
    let stamp = record
        .timestamp
        .as_deref()
        .map(file_stem)
        .unwrap_or_else(|| Utc::now().format(TIMESTAMP_FORMAT).to_string());

    let responses = results_dir.join(format!("{stem}_responses_{stamp}.json"));
    let scored = results_dir.join(format!("{stem}_scored_{stamp}.json"));
    write_json(&responses, record)?;
    write_json(&scored, profile)?;

    let latest = if write_latest {
        let latest_responses = results_dir.join(format!("{stem}_responses.json"));
        let latest_scored = results_dir.join(format!("{stem}_scored.json"));
        write_json(&latest_responses, record)?;
        write_json(&latest_scored, profile)?;
        Some((latest_responses, latest_scored))
    } else {
        None
    };

    info!(
        responses = %responses.display(),
        scored = %scored.display(),
        "saved scoring run"
    );

    Ok(RunPaths {
        responses,
        scored,
        latest,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(Bfi2Error::Io)
}

/// Response files under `root` (`*_responses*.json`), sorted by path.
pub fn discover_response_files(root: &Path) -> Vec<PathBuf> {
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.contains("_responses") && name.ends_with(".json")
        })
        .map(|entry| entry.path().to_path_buf())
        .collect::<Vec<_>>();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score, ScoringConfig};
    use crate::types::ResponseSet;
    use tempfile::TempDir;

    fn run(persona: &str) -> (ResponseFile, ScoredProfile) {
        let config = ScoringConfig::bfi2().expect("embedded key should load");
        let responses = ResponseSet::from_iter([(1, 5), (2, 4)]);
        let mut record = ResponseFile::record(persona, &responses, &config);
        record.timestamp = Some("20250101_120000".to_string());
        let profile = score(&config, &responses, persona);
        (record, profile)
    }

    #[test]
    fn file_stem_replaces_unsafe_characters() {
        assert_eq!(file_stem("high_agreeableness"), "high_agreeableness");
        assert_eq!(file_stem("P-014 / pre"), "P-014___pre");
        assert_eq!(file_stem("../etc"), "___etc");
        assert_eq!(file_stem("  "), "unknown");
    }

    #[test]
    fn write_run_writes_stamped_and_latest_files() {
        let dir = TempDir::new().expect("temp dir should be created");
        let results = dir.path().join("results");
        let (record, profile) = run("neutral_control");

        let paths = write_run(&results, &record, &profile, true).expect("run should save");
        assert_eq!(
            paths.responses,
            results.join("neutral_control_responses_20250101_120000.json")
        );
        assert_eq!(
            paths.scored,
            results.join("neutral_control_scored_20250101_120000.json")
        );
        let (latest_responses, latest_scored) = paths.latest.expect("latest copies written");
        assert!(latest_responses.exists());

        let saved: ScoredProfile = serde_json::from_str(
            &fs::read_to_string(&latest_scored).expect("scored file should read"),
        )
        .expect("scored file should parse");
        assert_eq!(saved, profile);

        let saved_record: ResponseFile = serde_json::from_str(
            &fs::read_to_string(&paths.responses).expect("responses file should read"),
        )
        .expect("responses file should parse");
        assert_eq!(saved_record, record);
    }

    #[test]
    fn write_run_skips_latest_when_disabled() {
        let dir = TempDir::new().expect("temp dir should be created");
        let (record, profile) = run("p1");

        let paths = write_run(dir.path(), &record, &profile, false).expect("run should save");
        assert!(paths.latest.is_none());
        assert!(!dir.path().join("p1_scored.json").exists());
        assert!(paths.scored.exists());
    }

    #[test]
    fn discover_finds_response_files_recursively() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("nested")).expect("nested dir should create");
        fs::write(dir.path().join("b_responses.json"), "{}").expect("write");
        fs::write(dir.path().join("nested/a_responses_20250101_120000.json"), "{}")
            .expect("write");
        fs::write(dir.path().join("a_scored.json"), "{}").expect("write");
        fs::write(dir.path().join("notes_responses.txt"), "").expect("write");

        let found = discover_response_files(dir.path());
        assert_eq!(
            found,
            vec![
                dir.path().join("b_responses.json"),
                dir.path().join("nested/a_responses_20250101_120000.json"),
            ]
        );
    }
}
