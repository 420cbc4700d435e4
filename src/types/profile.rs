use super::{ItemId, Likert, OrderedMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Score = f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetScore {
    pub name: String,
    pub score: Score,
    pub items: Vec<ItemId>,
    pub raw_responses: BTreeMap<ItemId, Likert>,
    /// After reverse coding.
    pub scored_responses: BTreeMap<ItemId, Likert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub name: String,
    pub code: String,
    pub score: Score,
    pub interpretation: String,
    pub items: Vec<ItemId>,
    pub facets: OrderedMap<FacetScore>,
    pub raw_responses: BTreeMap<ItemId, Likert>,
    pub scored_responses: BTreeMap<ItemId, Likert>,
}

/// Complete scoring result for one response set.
///
/// `summary` maps each domain code to its score and is derived from
/// `domains` on construction. It is written out on serialization but never
/// read back: deserializing recomputes it, so it cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfileRecord")]
pub struct ScoredProfile {
    persona: String,
    total_questions: usize,
    summary: OrderedMap<Score>,
    domains: OrderedMap<DomainScore>,
}

#[derive(Deserialize)]
struct ProfileRecord {
    persona: String,
    total_questions: usize,
    domains: OrderedMap<DomainScore>,
}

impl From<ProfileRecord> for ScoredProfile {
    fn from(record: ProfileRecord) -> Self {
        ScoredProfile::new(record.persona, record.total_questions, record.domains)
    }
}

impl ScoredProfile {
    pub fn new(
        persona: impl Into<String>,
        total_questions: usize,
        domains: OrderedMap<DomainScore>,
    ) -> Self {
        let summary = domains
            .values()
            .map(|domain| (domain.code.clone(), domain.score))
            .collect();
        Self {
            persona: persona.into(),
            total_questions,
            summary,
            domains,
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Number of answers actually supplied, not the number configured.
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn domains(&self) -> &OrderedMap<DomainScore> {
        &self.domains
    }

    pub fn domain(&self, name: &str) -> Option<&DomainScore> {
        self.domains.get(name)
    }

    pub fn summary(&self) -> &OrderedMap<Score> {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(name: &str, code: &str, score: Score) -> DomainScore {
        DomainScore {
            name: name.to_string(),
            code: code.to_string(),
            score,
            interpretation: "Average".to_string(),
            items: vec![1],
            facets: OrderedMap::new(),
            raw_responses: BTreeMap::from([(1, 3)]),
            scored_responses: BTreeMap::from([(1, 3)]),
        }
    }

    fn sample() -> ScoredProfile {
        let domains = [
            ("Extraversion".to_string(), domain("Extraversion", "E", 3.25)),
            ("Agreeableness".to_string(), domain("Agreeableness", "A", 4.5)),
        ]
        .into_iter()
        .collect();
        ScoredProfile::new("sample", 1, domains)
    }

    #[test]
    fn summary_follows_domain_order() {
        let profile = sample();
        assert_eq!(
            profile.summary().iter().collect::<Vec<_>>(),
            vec![("E", &3.25), ("A", &4.5)]
        );
    }

    #[test]
    fn deserializing_ignores_a_tampered_summary() {
        let json = serde_json::to_string(&sample()).expect("profile should serialize");
        let tampered = json.replace(r#""summary":{"E":3.25"#, r#""summary":{"E":1.0"#);
        assert_ne!(tampered, json);

        let profile: ScoredProfile =
            serde_json::from_str(&tampered).expect("profile should deserialize");
        assert_eq!(profile.summary().get("E"), Some(&3.25));
        assert_eq!(profile, sample());
    }

    #[test]
    fn serialized_field_names_are_snake_case() {
        let json = serde_json::to_string(&sample()).expect("profile should serialize");
        assert!(json.starts_with(r#"{"persona":"sample","total_questions":1,"summary":"#));
        assert!(json.contains(r#""raw_responses":{"1":3}"#));
        assert!(json.contains(r#""scored_responses":{"1":3}"#));
    }
}
