use crate::error::{Bfi2Error, Result, ValidationError};
use crate::scoring::ScoringConfig;
use crate::types::{ItemId, ResponseSet};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// On-disk record of one completed survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_config_sha256: Option<String>,
    pub responses: BTreeMap<ItemId, i64>,
}

impl ResponseFile {
    /// Record for a survey run that just finished.
    pub fn record(persona: &str, responses: &ResponseSet, config: &ScoringConfig) -> Self {
        Self {
            persona: Some(persona.to_string()),
            model: None,
            timestamp: Some(Utc::now().format(TIMESTAMP_FORMAT).to_string()),
            total_questions: Some(responses.len()),
            scoring_config_sha256: Some(config.digest().to_string()),
            responses: responses
                .iter()
                .map(|(item, value)| (item, i64::from(value)))
                .collect(),
        }
    }

    /// Boundary validation: every answer must lie in 1..=5.
    pub fn response_set(&self) -> std::result::Result<ResponseSet, ValidationError> {
        ResponseSet::validated(&self.responses)
    }
}

pub fn load_response_file(path: &Path) -> Result<ResponseFile> {
    if !path.exists() {
        return Err(Bfi2Error::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Configured items the response set does not answer. The scorer treats
/// them as neutral; callers use this to warn about incomplete surveys.
pub fn missing_items(responses: &ResponseSet, config: &ScoringConfig) -> Vec<ItemId> {
    config
        .item_ids()
        .into_iter()
        .filter(|item| !responses.contains(*item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_pipeline_response_file() {
        let file: ResponseFile = serde_json::from_str(
            r#"
{
  "persona": "high_agreeableness",
  "model": "openai/gpt-4o",
  "timestamp": "20250101_120000",
  "total_questions": 3,
  "responses": { "2": 5, "7": 1, "12": 4 }
}
"#,
        )
        .expect("response file should parse");

        assert_eq!(file.persona.as_deref(), Some("high_agreeableness"));
        let responses = file.response_set().expect("responses are valid");
        assert_eq!(responses.get(7), Some(1));
        assert_eq!(responses.len(), 3);
    }

    #[test]
    fn bare_response_map_is_enough() {
        let file: ResponseFile = serde_json::from_str(r#"{ "responses": { "1": 3 } }"#)
            .expect("minimal file should parse");
        assert!(file.persona.is_none());
        assert_eq!(file.response_set().expect("valid").len(), 1);
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let file: ResponseFile =
            serde_json::from_str(r#"{ "responses": { "1": 3, "2": 9, "3": -1 } }"#)
                .expect("file should parse");
        assert_eq!(
            file.response_set().expect_err("values should be rejected"),
            ValidationError::OutOfRange { items: vec![2, 3] }
        );
    }

    #[test]
    fn non_numeric_item_ids_fail_to_parse() {
        let parsed = serde_json::from_str::<ResponseFile>(r#"{ "responses": { "q1": 3 } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn record_captures_digest_and_count() {
        let config = ScoringConfig::bfi2().expect("embedded key should load");
        let responses = ResponseSet::from_iter([(1, 4), (2, 5)]);

        let record = ResponseFile::record("rater", &responses, &config);
        assert_eq!(record.total_questions, Some(2));
        assert_eq!(
            record.scoring_config_sha256.as_deref(),
            Some(config.digest())
        );
        assert_eq!(record.response_set().expect("valid"), responses);
        assert_eq!(record.timestamp.as_deref().map(str::len), Some(15));
    }

    #[test]
    fn missing_items_lists_unanswered_configured_items() {
        let config = ScoringConfig::bfi2().expect("embedded key should load");
        let responses = (1..=58).map(|item| (item, 3)).collect::<ResponseSet>();
        assert_eq!(missing_items(&responses, &config), vec![59, 60]);
    }

    #[test]
    fn load_response_file_reports_missing_path() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load_response_file(&dir.path().join("absent.json"))
            .expect_err("missing file should fail");
        assert!(matches!(err, Bfi2Error::PathNotFound(_)));

        let path = dir.path().join("p_responses.json");
        fs::write(&path, r#"{ "responses": { "5": 2 } }"#).expect("file should write");
        let file = load_response_file(&path).expect("file should load");
        assert_eq!(file.responses.get(&5), Some(&2));
    }
}
