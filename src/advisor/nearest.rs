//! Nearest open issue lookup

use tracing::debug;

use super::distance::haversine_km;
use crate::models::{Coordinate, IssueLocation};

/// Closest issue to `from` that is not resolved.
///
/// Ties go to the candidate that appears first in `candidates`.
#[must_use]
pub fn find_nearest<'a>(from: &Coordinate, candidates: &'a [IssueLocation]) -> Option<&'a IssueLocation> {
    find_nearest_with_distance(from, candidates).map(|(issue, _)| issue)
}

/// Like [`find_nearest`] but also returns the distance in kilometers
#[must_use]
pub fn find_nearest_with_distance<'a>(
    from: &Coordinate,
    candidates: &'a [IssueLocation],
) -> Option<(&'a IssueLocation, f64)> {
    let open: Vec<&IssueLocation> = candidates.iter().filter(|i| i.status.is_open()).collect();

    let found = nearest_index(from, &open).map(|(index, distance)| (open[index], distance));
    if let Some((issue, distance)) = found {
        debug!("Nearest open issue {} at {:.3} km", issue.id, distance);
    } else {
        debug!("No open issue among {} candidates", candidates.len());
    }
    found
}

/// Index and distance of the entry closest to `from`, first one winning ties
pub(crate) fn nearest_index(from: &Coordinate, issues: &[&IssueLocation]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (index, issue) in issues.iter().enumerate() {
        let distance = haversine_km(from, &issue.coordinate);
        // strict comparison: an equal distance never displaces an earlier issue
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }

    best
}
