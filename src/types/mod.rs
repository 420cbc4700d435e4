pub mod ordered;
pub mod profile;
pub mod settings;

pub use ordered::OrderedMap;
pub use profile::{DomainScore, FacetScore, ScoredProfile};

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Questionnaire item identifier, 1-based.
pub type ItemId = u32;

/// A single Likert answer. Valid answers lie in `[RESPONSE_MIN, RESPONSE_MAX]`.
pub type Likert = i32;

pub const RESPONSE_MIN: Likert = 1;
pub const RESPONSE_MAX: Likert = 5;
pub const NEUTRAL_RESPONSE: Likert = 3;

/// Answers keyed by item id. Need not be complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<ItemId, Likert>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boundary check for untrusted answers. Every out-of-range item is
    /// reported, not just the first.
    pub fn validated(raw: &BTreeMap<ItemId, i64>) -> Result<Self, ValidationError> {
        let range = i64::from(RESPONSE_MIN)..=i64::from(RESPONSE_MAX);
        let invalid = raw
            .iter()
            .filter(|(_, value)| !range.contains(value))
            .map(|(item, _)| *item)
            .collect::<Vec<_>>();
        if !invalid.is_empty() {
            return Err(ValidationError::OutOfRange { items: invalid });
        }

        Ok(Self(
            raw.iter()
                .map(|(item, value)| (*item, *value as Likert))
                .collect(),
        ))
    }

    pub fn get(&self, item: ItemId) -> Option<Likert> {
        self.0.get(&item).copied()
    }

    /// The answer for `item`, or the neutral midpoint when it was skipped.
    pub fn get_or_neutral(&self, item: ItemId) -> Likert {
        self.get(item).unwrap_or(NEUTRAL_RESPONSE)
    }

    pub fn insert(&mut self, item: ItemId, value: Likert) -> Option<Likert> {
        self.0.insert(item, value)
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.0.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, Likert)> + '_ {
        self.0.iter().map(|(item, value)| (*item, *value))
    }
}

impl FromIterator<(ItemId, Likert)> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = (ItemId, Likert)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<ItemId, Likert>> for ResponseSet {
    fn from(value: BTreeMap<ItemId, Likert>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_items_read_as_neutral() {
        let responses = ResponseSet::from_iter([(2, 5)]);
        assert_eq!(responses.get_or_neutral(2), 5);
        assert_eq!(responses.get_or_neutral(7), NEUTRAL_RESPONSE);
        assert_eq!(responses.len(), 1);
    }

    #[test]
    fn validated_rejects_every_out_of_range_item() {
        let raw = BTreeMap::from([(1, 3), (2, 0), (3, 6), (4, 5)]);
        let err = ResponseSet::validated(&raw).expect_err("values outside 1..=5 should fail");
        assert_eq!(err, ValidationError::OutOfRange { items: vec![2, 3] });
    }

    #[test]
    fn validated_accepts_boundaries_and_empty_sets() {
        let raw = BTreeMap::from([(1, 1), (2, 5)]);
        let responses = ResponseSet::validated(&raw).expect("boundary values are valid");
        assert_eq!(responses.get(1), Some(1));
        assert_eq!(responses.get(2), Some(5));

        let empty = ResponseSet::validated(&BTreeMap::new()).expect("empty set is valid");
        assert!(empty.is_empty());
    }

    #[test]
    fn serializes_as_plain_object() {
        let responses = ResponseSet::from_iter([(12, 4), (2, 5)]);
        let json = serde_json::to_string(&responses).expect("responses should serialize");
        assert_eq!(json, r#"{"2":5,"12":4}"#);
        let back: ResponseSet = serde_json::from_str(&json).expect("responses should parse");
        assert_eq!(back, responses);
    }
}
