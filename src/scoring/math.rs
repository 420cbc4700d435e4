use crate::types::profile::Score;
use crate::types::{Likert, RESPONSE_MAX, RESPONSE_MIN};

/// Reflects a 1-5 answer about the midpoint when the item is reverse keyed.
/// Input is trusted; no range check happens here.
pub fn reverse_score(response: Likert, is_reverse: bool) -> Likert {
    if is_reverse {
        RESPONSE_MIN + RESPONSE_MAX - response
    } else {
        response
    }
}

/// Arithmetic mean rounded to two decimals, half away from zero.
/// An empty slice scores 0.0.
pub fn mean(values: &[Likert]) -> Score {
    if values.is_empty() {
        return 0.0;
    }
    let total: i64 = values.iter().map(|value| i64::from(*value)).sum();
    round2(total as f64 / values.len() as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
