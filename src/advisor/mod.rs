//! Route advisor
//!
//! Pure, stateless functions used for field-worker dispatch:
//! - Great-circle distance between coordinates
//! - Nearest open issue to a position
//! - Greedy nearest-neighbor visiting order over open issues
//!
//! Inputs are assumed to be validated by the caller (see [`crate::dispatch`]).

pub mod distance;
pub mod nearest;
pub mod route;

pub use distance::{EARTH_RADIUS_KM, MAX_DISTANCE_KM, haversine_km};
pub use nearest::{find_nearest, find_nearest_with_distance};
pub use route::{RoutePlan, RouteStep, plan_route};
