//! Picking one building out of ranked search hits.

use tracing::debug;

use crate::catalog::BuildingIndex;
use crate::error::{ResolveError, Result};

/// Standard deviations the top score must sit above the mean to count as a
/// confident match.
const MIN_STD_SCORE: f64 = 2.0;

/// Resolve a free-text building query to a single building id.
///
/// A lone hit is accepted unconditionally; otherwise the top hit must be a
/// clear outlier among the returned scores, else the query is ambiguous and
/// every candidate is logged for the operator.
pub fn resolve_building(index: &BuildingIndex, query: &str) -> Result<String> {
    let hits = index.search(query)?;
    let scores: Vec<f64> = hits.iter().map(|(_, score)| *score as f64).collect();
    if confidence_in_first(&scores)? {
        return Ok(hits[0].0.clone());
    }
    for (id, score) in &hits {
        debug!(building = %id, score, "candidate");
    }
    Err(ResolveError::Ambiguous {
        hits: hits.len() as u64,
    }
    .into())
}

/// Whether the first score stands far enough above the rest to trust.
///
/// The yardstick is the sample deviation of the competing scores only;
/// folding the top score into its own yardstick would let one outlier
/// inflate the spread it is measured against.
fn confidence_in_first(scores: &[f64]) -> Result<bool> {
    let Some((&top, rest)) = scores.split_first() else {
        return Err(ResolveError::EmptyInput.into());
    };
    if rest.is_empty() {
        return Ok(true);
    }
    if rest.len() < 2 {
        // one competitor gives no spread estimate
        return Ok(false);
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let rest_mean = rest.iter().sum::<f64>() / rest.len() as f64;
    let rest_variance = rest.iter().map(|s| (s - rest_mean).powi(2)).sum::<f64>()
        / (rest.len() - 1) as f64;
    let std_dev = rest_variance.sqrt();
    if std_dev == 0.0 {
        return Ok(false);
    }
    Ok((top - mean) / std_dev > MIN_STD_SCORE)
}
