use crate::error::{Bfi2Error, Result};
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const BFI2_QUESTIONS_JSON: &str = include_str!("../../data/bfi2/questions.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: ItemId,
    /// Completes the stem "I am someone who ...".
    pub text: String,
    pub domain: String,
    pub facet: String,
    #[serde(default)]
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    pub items: Vec<Question>,
}

impl QuestionBank {
    pub fn bfi2() -> Result<Self> {
        Self::from_json_str(BFI2_QUESTIONS_JSON)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.items.iter()
    }
}

pub fn load_questions(path: &Path) -> Result<QuestionBank> {
    if !path.exists() {
        return Err(Bfi2Error::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    QuestionBank::from_json_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringConfig;

    #[test]
    fn bfi2_bank_has_sixty_items_in_order() {
        let bank = QuestionBank::bfi2().expect("embedded questions should load");
        assert_eq!(bank.len(), 60);
        assert_eq!(
            bank.iter().map(|question| question.id).collect::<Vec<_>>(),
            (1..=60).collect::<Vec<_>>()
        );
        assert_eq!(bank.items[0].text, "Is outgoing, sociable");
    }

    #[test]
    fn bfi2_bank_agrees_with_scoring_key() {
        let bank = QuestionBank::bfi2().expect("embedded questions should load");
        let config = ScoringConfig::bfi2().expect("embedded key should load");

        for question in bank.iter() {
            let domain = config
                .domain(&question.domain)
                .unwrap_or_else(|| panic!("unknown domain for item {}", question.id));
            let facet = domain
                .facets
                .get(&question.facet)
                .unwrap_or_else(|| panic!("unknown facet for item {}", question.id));
            assert!(facet.items.contains(&question.id), "item {}", question.id);
            assert_eq!(facet.is_reverse(question.id), question.reverse, "item {}", question.id);
            assert_eq!(domain.is_reverse(question.id), question.reverse, "item {}", question.id);
        }
    }

    #[test]
    fn reverse_flag_defaults_to_false() {
        let bank = QuestionBank::from_json_str(
            r#"{ "items": [ { "id": 1, "text": "Is talkative", "domain": "E", "facet": "S" } ] }"#,
        )
        .expect("bank should parse");
        assert!(!bank.items[0].reverse);
        assert!(bank.instrument.is_none());
    }
}
