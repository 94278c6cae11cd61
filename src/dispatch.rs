//! Field dispatch
//!
//! Adapter between callers (CLI, HTTP) and the route advisor. It validates the
//! worker position and the issue snapshot, applies the configured defaults and turns
//! advisor results into outcomes with user-facing messages.

use std::collections::HashSet;

use rand::RngExt;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::advisor::{RoutePlan, find_nearest_with_distance, plan_route};
use crate::config::CivicRouteConfig;
use crate::models::{Coordinate, IssueLocation, IssueStats, Priority};
use crate::region::{
    RegionBox, classify_region, describe_location, describe_location_with_rng, matching_region,
};
use crate::routing::{RouteSummary, RoutingProvider, StraightLineRouting};
use crate::{CivicRouteError, Result};

pub const NO_NEARBY_ISSUES: &str = "No unresolved issues found in your area.";
pub const NO_ROUTE_ISSUES: &str = "No high-priority unresolved issues found.";

/// Result of a nearest-issue lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestOutcome {
    pub issue: Option<IssueLocation>,
    pub distance_km: Option<f64>,
    pub message: String,
}

/// Result of a route optimization request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub start: Coordinate,
    pub priorities: Vec<Priority>,
    pub plan: RoutePlan,
    pub summary: Option<RouteSummary>,
    pub message: String,
}

/// Region lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub region: Option<String>,
    pub address: Option<String>,
}

pub struct FieldDispatcher {
    regions: Vec<RegionBox>,
    default_priorities: HashSet<Priority>,
    routing: Box<dyn RoutingProvider>,
}

impl FieldDispatcher {
    pub fn new(
        regions: Vec<RegionBox>,
        default_priorities: HashSet<Priority>,
        routing: Box<dyn RoutingProvider>,
    ) -> Self {
        Self {
            regions,
            default_priorities,
            routing,
        }
    }

    /// Dispatcher using straight-line routing at the configured speed
    pub fn from_config(config: &CivicRouteConfig) -> Result<Self> {
        let routing = StraightLineRouting::new(config.routing.average_speed_kmh)?;
        Ok(Self::new(
            config.regions.clone(),
            config.routing.default_priorities.iter().copied().collect(),
            Box::new(routing),
        ))
    }

    #[must_use]
    pub fn regions(&self) -> &[RegionBox] {
        &self.regions
    }

    /// Closest unresolved issue to the worker
    #[instrument(skip(self, issues), fields(issues = issues.len()))]
    pub fn nearest(&self, worker: Coordinate, issues: &[IssueLocation]) -> Result<NearestOutcome> {
        validate_request(&worker, issues)?;

        let outcome = match find_nearest_with_distance(&worker, issues) {
            Some((issue, distance)) => NearestOutcome {
                message: format!(
                    "Found nearest issue: {} ({distance:.2} km away)",
                    issue.display_type()
                ),
                issue: Some(issue.clone()),
                distance_km: Some(distance),
            },
            None => NearestOutcome {
                issue: None,
                distance_km: None,
                message: NO_NEARBY_ISSUES.to_string(),
            },
        };

        info!("{}", outcome.message);
        Ok(outcome)
    }

    /// Visiting order over unresolved issues, restricted to `priorities` or to the
    /// configured defaults when none are given
    #[instrument(skip(self, issues, priorities), fields(issues = issues.len()))]
    pub fn optimize(
        &self,
        worker: Coordinate,
        issues: &[IssueLocation],
        priorities: Option<HashSet<Priority>>,
    ) -> Result<RouteOutcome> {
        validate_request(&worker, issues)?;

        let filter = priorities.unwrap_or_else(|| self.default_priorities.clone());
        let mut priority_list: Vec<Priority> = filter.iter().copied().collect();
        priority_list.sort();

        let plan = plan_route(&worker, issues, Some(&filter));

        if plan.is_empty() {
            info!("{}", NO_ROUTE_ISSUES);
            return Ok(RouteOutcome {
                start: worker,
                priorities: priority_list,
                plan,
                summary: None,
                message: NO_ROUTE_ISSUES.to_string(),
            });
        }

        let summary = self.routing.summarize(&plan.waypoints(&worker))?;
        let message = format!(
            "Optimized route created for {} issues. Total distance: {:.2} km. Estimated time: {} minutes",
            plan.len(),
            summary.distance_km,
            summary.duration_minutes
        );
        info!("{}", message);

        Ok(RouteOutcome {
            start: worker,
            priorities: priority_list,
            plan,
            summary: Some(summary),
            message,
        })
    }

    /// Region and a display address drawn from its pool
    pub fn classify(&self, coordinate: Coordinate) -> Result<Classification> {
        coordinate.validate()?;
        Ok(Classification {
            region: matching_region(&coordinate, &self.regions).map(|r| r.name.clone()),
            address: classify_region(&coordinate, &self.regions),
        })
    }

    /// Display address, synthesized when no region matches
    pub fn describe(&self, coordinate: Coordinate) -> Result<String> {
        coordinate.validate()?;
        Ok(describe_location(&coordinate, &self.regions))
    }

    /// Region plus an address that is always present, synthesized outside known regions
    pub fn locate(&self, coordinate: Coordinate) -> Result<Classification> {
        self.locate_with_rng(coordinate, &mut rand::rng())
    }

    /// Like [`FieldDispatcher::locate`] with the address drawn from `rng`
    pub fn locate_with_rng<R: RngExt>(&self, coordinate: Coordinate, rng: &mut R) -> Result<Classification> {
        coordinate.validate()?;
        Ok(Classification {
            region: matching_region(&coordinate, &self.regions).map(|r| r.name.clone()),
            address: Some(describe_location_with_rng(&coordinate, &self.regions, rng)),
        })
    }

    #[must_use]
    pub fn stats(&self, issues: &[IssueLocation]) -> IssueStats {
        IssueStats::from_issues(issues)
    }
}

fn validate_request(worker: &Coordinate, issues: &[IssueLocation]) -> Result<()> {
    worker
        .validate()
        .map_err(|e| CivicRouteError::validation(format!("worker location: {e}")))?;

    let mut seen = HashSet::with_capacity(issues.len());
    for issue in issues {
        issue.validate()?;
        if !seen.insert(issue.id.as_str()) {
            return Err(CivicRouteError::validation(format!(
                "duplicate issue id '{}'",
                issue.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn dispatcher() -> FieldDispatcher {
        FieldDispatcher::from_config(&CivicRouteConfig::default()).unwrap()
    }

    fn issue(id: &str, lat: f64, lng: f64, priority: Priority) -> IssueLocation {
        IssueLocation::new(
            id,
            Coordinate::new(lat, lng).unwrap(),
            priority,
            Status::Submitted,
        )
    }

    fn worker() -> Coordinate {
        Coordinate::new(13.0, 80.0).unwrap()
    }

    #[test]
    fn test_nearest_message() {
        let issues = vec![issue("A", 13.01, 80.0, Priority::High).with_type("Potholes")];
        let outcome = dispatcher().nearest(worker(), &issues).unwrap();
        assert_eq!(outcome.issue.unwrap().id, "A");
        assert_eq!(outcome.message, "Found nearest issue: Potholes (1.11 km away)");
    }

    #[test]
    fn test_nearest_none() {
        let outcome = dispatcher().nearest(worker(), &[]).unwrap();
        assert!(outcome.issue.is_none());
        assert_eq!(outcome.message, NO_NEARBY_ISSUES);
    }

    #[test]
    fn test_invalid_worker_rejected() {
        let bad = Coordinate {
            latitude: 95.0,
            longitude: 0.0,
        };
        let err = dispatcher().nearest(bad, &[]).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("worker location"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let issues = vec![
            issue("A", 13.01, 80.0, Priority::High),
            issue("A", 13.02, 80.0, Priority::High),
        ];
        let err = dispatcher().optimize(worker(), &issues, None).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_default_filter_excludes_low() {
        let issues = vec![
            issue("A", 13.01, 80.0, Priority::High),
            issue("B", 13.5, 80.5, Priority::Low),
            issue("C", 13.02, 80.01, Priority::Medium),
        ];
        let outcome = dispatcher().optimize(worker(), &issues, None).unwrap();
        assert_eq!(outcome.plan.issue_ids(), vec!["A", "C"]);
        assert_eq!(
            outcome.priorities,
            vec![Priority::Medium, Priority::High, Priority::Emergency]
        );
        let summary = outcome.summary.unwrap();
        assert!((summary.distance_km - outcome.plan.total_distance_km).abs() < 1e-9);
        assert!(outcome.message.starts_with("Optimized route created for 2 issues."));
    }

    #[test]
    fn test_explicit_filter_overrides_default() {
        let issues = vec![
            issue("A", 13.01, 80.0, Priority::High),
            issue("B", 13.5, 80.5, Priority::Low),
        ];
        let only_low: HashSet<Priority> = [Priority::Low].into_iter().collect();
        let outcome = dispatcher().optimize(worker(), &issues, Some(only_low)).unwrap();
        assert_eq!(outcome.plan.issue_ids(), vec!["B"]);
    }

    #[test]
    fn test_empty_route_message() {
        let issues = vec![issue("B", 13.5, 80.5, Priority::Low)];
        let outcome = dispatcher().optimize(worker(), &issues, None).unwrap();
        assert!(outcome.plan.is_empty());
        assert!(outcome.summary.is_none());
        assert_eq!(outcome.message, NO_ROUTE_ISSUES);
    }

    #[test]
    fn test_classify() {
        let d = dispatcher();
        let result = d.classify(Coordinate::new(28.6, 77.2).unwrap()).unwrap();
        assert_eq!(result.region.as_deref(), Some("New Delhi"));
        assert!(d.regions()[2].addresses.contains(&result.address.unwrap()));

        let nowhere = d.classify(Coordinate::new(0.0, 0.0).unwrap()).unwrap();
        assert!(nowhere.region.is_none());
        assert!(nowhere.address.is_none());
        assert!(d.describe(Coordinate::new(0.0, 0.0).unwrap()).unwrap().ends_with("India"));
    }

    #[test]
    fn test_locate_with_seed_is_reproducible() {
        use rand::{SeedableRng, rngs::StdRng};

        let d = dispatcher();
        let chennai = Coordinate::new(13.0, 80.2).unwrap();
        let first = d.locate_with_rng(chennai, &mut StdRng::seed_from_u64(7)).unwrap();
        let again = d.locate_with_rng(chennai, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, again);
        assert_eq!(first.region.as_deref(), Some("Kanchipuram District"));
        assert!(d.regions()[0].addresses.contains(first.address.as_ref().unwrap()));

        let open_sea = Coordinate::new(0.0, 0.0).unwrap();
        let synthetic = d.locate_with_rng(open_sea, &mut StdRng::seed_from_u64(7)).unwrap();
        assert!(synthetic.region.is_none());
        assert!(synthetic.address.unwrap().ends_with(", India"));

        let bad = Coordinate {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(d.locate(bad).unwrap_err().is_validation());
    }
}
