//! Data models for the CivicRoute application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and their validation
//! - Issue: Issue reports, priorities, statuses and dashboard counters

pub mod issue;
pub mod location;

// Re-export all public types for convenient access
pub use issue::{IssueFilter, IssueLocation, IssueStats, Priority, Status, department_for};
pub use location::Coordinate;
