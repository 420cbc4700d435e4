use crate::types::ItemId;
use thiserror::Error;

/// A scoring configuration that cannot be used. Every variant names the
/// offending field so a broken document can be fixed without guesswork.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("scoring config parse error: {0}")]
    Parse(String),

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("{field}: item id must be a positive integer")]
    InvalidItemId { field: String },

    #[error("{field}: item {item} is listed more than once")]
    DuplicateItem { field: String, item: ItemId },

    #[error("{field}: reverse item {item} is not in the item list")]
    DanglingReverseItem { field: String, item: ItemId },

    #[error("{field}: item {item} belongs to more than one facet")]
    OverlappingFacets { field: String, item: ItemId },

    #[error("{field}: facet items do not cover the domain items (differs on {items:?})")]
    FacetCoverage { field: String, items: Vec<ItemId> },

    #[error("{field}: domain code '{code}' is already used by another domain")]
    DuplicateCode { field: String, code: String },

    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange { field: String, min: f64, max: f64 },
}

/// Raw responses rejected at the boundary, before they reach the scorer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("responses must be between 1 and 5 (invalid items: {})", join_ids(.items))]
    OutOfRange { items: Vec<ItemId> },
}

fn join_ids(items: &[ItemId]) -> String {
    items
        .iter()
        .map(ItemId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum Bfi2Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("settings parse error: {0}")]
    SettingsParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("responder closed before question {0} was answered")]
    ResponderClosed(ItemId),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Bfi2Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_lists_every_item() {
        let err = ValidationError::OutOfRange {
            items: vec![3, 17],
        };
        assert_eq!(
            err.to_string(),
            "responses must be between 1 and 5 (invalid items: 3, 17)"
        );
    }

    #[test]
    fn config_errors_name_the_field() {
        let err = ConfigError::MissingField {
            field: "domains.Agreeableness.code".to_string(),
        };
        assert!(err.to_string().contains("domains.Agreeableness.code"));

        let err = Bfi2Error::from(ConfigError::InvertedRange {
            field: "interpretation.ranges.low".to_string(),
            min: 2.5,
            max: 1.5,
        });
        assert!(err.to_string().contains("interpretation.ranges.low"));
        assert!(err.to_string().contains("min 2.5 is greater than max 1.5"));
    }
}
