//! Greedy nearest-neighbor route ordering for field visits
//!
//! This is a heuristic, not an optimal traveling-salesman solver: from the current
//! position it always walks to the closest unvisited issue and never backtracks or
//! reconsiders an earlier choice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::nearest::nearest_index;
use crate::models::{Coordinate, IssueLocation, Priority};

/// One hop of a planned route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub issue_id: String,
    pub coordinate: Coordinate,
    /// Distance from the previous position in kilometers
    pub leg_distance_km: f64,
}

/// Ordered visiting plan produced by [`plan_route`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub steps: Vec<RouteStep>,
    pub total_distance_km: f64,
}

impl RoutePlan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Issue ids in visiting order
    #[must_use]
    pub fn issue_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.issue_id.as_str()).collect()
    }

    /// The start position followed by every stop, in order
    #[must_use]
    pub fn waypoints(&self, start: &Coordinate) -> Vec<Coordinate> {
        std::iter::once(*start)
            .chain(self.steps.iter().map(|s| s.coordinate))
            .collect()
    }
}

/// Order the open issues by repeatedly visiting the nearest remaining one.
///
/// Resolved issues are dropped, and when `priority_filter` is given only issues whose
/// priority is in it are kept. An empty working set gives an empty plan.
#[must_use]
pub fn plan_route(
    start: &Coordinate,
    issues: &[IssueLocation],
    priority_filter: Option<&HashSet<Priority>>,
) -> RoutePlan {
    let mut remaining: Vec<&IssueLocation> = issues
        .iter()
        .filter(|issue| issue.status.is_open())
        .filter(|issue| priority_filter.is_none_or(|filter| filter.contains(&issue.priority)))
        .collect();

    debug!(
        "Planning route over {} of {} issues",
        remaining.len(),
        issues.len()
    );

    let mut current = *start;
    let mut steps = Vec::with_capacity(remaining.len());

    while let Some((index, distance)) = nearest_index(&current, &remaining) {
        // Vec::remove keeps the rest in input order, which the tie-break relies on
        let next = remaining.remove(index);
        steps.push(RouteStep {
            issue_id: next.id.clone(),
            coordinate: next.coordinate,
            leg_distance_km: distance,
        });
        current = next.coordinate;
    }

    let total_distance_km = steps.iter().map(|s| s.leg_distance_km).sum();

    RoutePlan {
        steps,
        total_distance_km,
    }
}
