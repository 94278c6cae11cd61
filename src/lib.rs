//! `CivicRoute` - route advisor for civic issue field dispatch
//!
//! This library provides great-circle distances, nearest open issue lookup and a
//! greedy nearest-neighbor visiting order for field workers, plus the thin adapters
//! (configuration, issue sources, HTTP API) around them.

pub mod advisor;
pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod issue_source;
pub mod logging;
pub mod models;
pub mod region;
pub mod routing;
pub mod web;

// Re-export core types for public API
pub use advisor::{RoutePlan, RouteStep, find_nearest, haversine_km, plan_route};
pub use config::CivicRouteConfig;
pub use dispatch::FieldDispatcher;
pub use error::CivicRouteError;
pub use issue_source::{IssueSource, JsonFileSource, SampleIssues};
pub use models::{Coordinate, IssueFilter, IssueLocation, IssueStats, Priority, Status};
pub use region::{RegionBox, classify_region};
pub use routing::{RouteSummary, RoutingProvider, StraightLineRouting};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CivicRouteError>;
