//! Response set to trait profile.
//!
//! Every function here is pure: the configuration is only read, the
//! response set is only read, and the result is owned by the caller. A
//! single [`ScoringConfig`] can back any number of concurrent calls.

pub mod config;
pub mod interpret;
pub mod math;

pub use config::{
    load_scoring_config, DomainConfig, FacetConfig, InterpretationRange, ScoringConfig,
};
pub use interpret::interpret;
pub use math::{mean, reverse_score};

use crate::types::{DomainScore, FacetScore, ItemId, Likert, ResponseSet, ScoredProfile};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

struct ItemSnapshot {
    raw: BTreeMap<ItemId, Likert>,
    scored: BTreeMap<ItemId, Likert>,
    values: Vec<Likert>,
}

fn snapshot(
    items: &[ItemId],
    reverse_items: &BTreeSet<ItemId>,
    responses: &ResponseSet,
) -> ItemSnapshot {
    let mut raw = BTreeMap::new();
    let mut scored = BTreeMap::new();
    let mut values = Vec::with_capacity(items.len());
    for &item in items {
        let response = responses.get_or_neutral(item);
        let value = reverse_score(response, reverse_items.contains(&item));
        raw.insert(item, response);
        scored.insert(item, value);
        values.push(value);
    }
    ItemSnapshot {
        raw,
        scored,
        values,
    }
}

/// Scores one facet. Facets carry no interpretation label.
pub fn score_facet(name: &str, facet: &FacetConfig, responses: &ResponseSet) -> FacetScore {
    let snapshot = snapshot(&facet.items, &facet.reverse_items, responses);
    FacetScore {
        name: name.to_string(),
        score: mean(&snapshot.values),
        items: facet.items.clone(),
        raw_responses: snapshot.raw,
        scored_responses: snapshot.scored,
    }
}

/// Scores one domain over its own item and reverse sets. The domain score is
/// not derived from the facet scores.
pub fn score_domain(
    name: &str,
    domain: &DomainConfig,
    ranges: &[InterpretationRange],
    responses: &ResponseSet,
) -> DomainScore {
    let snapshot = snapshot(&domain.items, &domain.reverse_items, responses);
    let score = mean(&snapshot.values);

    let facets = domain
        .facets
        .iter()
        .map(|(facet_name, facet)| {
            (
                facet_name.to_string(),
                score_facet(facet_name, facet, responses),
            )
        })
        .collect();

    DomainScore {
        name: name.to_string(),
        code: domain.code.clone(),
        score,
        interpretation: interpret(score, ranges).to_string(),
        items: domain.items.clone(),
        facets,
        raw_responses: snapshot.raw,
        scored_responses: snapshot.scored,
    }
}

/// Scores a response set against every configured domain, in declared order.
pub fn score(config: &ScoringConfig, responses: &ResponseSet, persona: &str) -> ScoredProfile {
    let domains = config
        .domains()
        .iter()
        .map(|(name, domain)| {
            (
                name.to_string(),
                score_domain(name, domain, config.interpretation_ranges(), responses),
            )
        })
        .collect();

    debug!(
        persona,
        answered = responses.len(),
        domains = config.domains().len(),
        "scored response set"
    );

    ScoredProfile::new(persona, responses.len(), domains)
}
