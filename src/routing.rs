//! Route summaries from a routing provider
//!
//! Turn-by-turn routing lives in an external service; this crate only needs the
//! distance/time summary for an ordered list of waypoints.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::advisor::haversine_km;
use crate::models::Coordinate;
use crate::{CivicRouteError, Result};

/// Distance and travel time for a whole route
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_minutes: u64,
}

/// Something that can summarize a route through ordered waypoints
pub trait RoutingProvider: Send + Sync {
    fn summarize(&self, waypoints: &[Coordinate]) -> Result<RouteSummary>;
}

/// Offline provider: straight-line legs at a constant average speed
#[derive(Debug, Clone, Copy)]
pub struct StraightLineRouting {
    average_speed_kmh: f64,
}

impl StraightLineRouting {
    pub fn new(average_speed_kmh: f64) -> Result<Self> {
        if !average_speed_kmh.is_finite() || average_speed_kmh <= 0.0 {
            return Err(CivicRouteError::routing(format!(
                "average speed must be positive, got {average_speed_kmh}"
            )));
        }
        Ok(Self { average_speed_kmh })
    }

    #[must_use]
    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }
}

impl RoutingProvider for StraightLineRouting {
    #[instrument(level = "debug", skip(self, waypoints), fields(waypoints = waypoints.len()))]
    fn summarize(&self, waypoints: &[Coordinate]) -> Result<RouteSummary> {
        let distance_km: f64 = waypoints
            .windows(2)
            .map(|pair| haversine_km(&pair[0], &pair[1]))
            .sum();

        let minutes = (distance_km / self.average_speed_kmh * 60.0).round();
        // finite and non-negative here
        let duration_minutes = minutes as u64;

        Ok(RouteSummary {
            distance_km,
            duration_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        assert!(StraightLineRouting::new(0.0).is_err());
        assert!(StraightLineRouting::new(-5.0).is_err());
        assert!(StraightLineRouting::new(f64::NAN).is_err());
    }

    #[test]
    fn test_short_waypoint_lists_are_zero() {
        let routing = StraightLineRouting::new(30.0).unwrap();
        assert_eq!(routing.summarize(&[]).unwrap(), RouteSummary::default());
        assert_eq!(
            routing.summarize(&[coord(13.0, 80.0)]).unwrap(),
            RouteSummary::default()
        );
    }

    #[test]
    fn test_sums_legs_and_estimates_time() {
        let routing = StraightLineRouting::new(60.0).unwrap();
        let waypoints = [coord(13.0, 80.0), coord(13.1, 80.0), coord(13.2, 80.0)];
        let summary = routing.summarize(&waypoints).unwrap();

        let expected = haversine_km(&waypoints[0], &waypoints[1]) + haversine_km(&waypoints[1], &waypoints[2]);
        assert!((summary.distance_km - expected).abs() < 1e-9);
        // ~22.2 km at 60 km/h
        assert_eq!(summary.duration_minutes, 22);
    }
}
