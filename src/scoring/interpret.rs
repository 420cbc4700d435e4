use super::config::InterpretationRange;
use crate::types::profile::Score;

/// Label for scores at or above the scale ceiling that no band claims.
pub const TOP_LABEL: &str = "Very High";
/// Label for any other score no band claims.
pub const DEFAULT_LABEL: &str = "Average";

const SCALE_CEILING: Score = 5.0;

/// First band in declared order with `min <= score < max`.
///
/// Never fails: a bad or missing band costs a label, not the scoring run.
pub fn interpret(score: Score, ranges: &[InterpretationRange]) -> &str {
    if let Some(range) = ranges.iter().find(|range| range.contains(score)) {
        return &range.label;
    }
    if score >= SCALE_CEILING {
        TOP_LABEL
    } else {
        DEFAULT_LABEL
    }
}
