//! Issue sources
//!
//! Issue records are owned by whatever stores them. Route planning only needs a
//! snapshot, which an [`IssueSource`] provides.

use std::path::{Path, PathBuf};

use chrono::{TimeDelta, Utc};
use tracing::{debug, info};

use crate::models::{Coordinate, IssueLocation, Priority, Status};
use crate::{CivicRouteError, Result};

/// Provides the current list of issues
pub trait IssueSource: Send + Sync {
    fn load_issues(&self) -> Result<Vec<IssueLocation>>;
}

/// Issues stored as a JSON array in a file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IssueSource for JsonFileSource {
    fn load_issues(&self) -> Result<Vec<IssueLocation>> {
        debug!("Loading issues from {}", self.path.display());

        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            CivicRouteError::issue_source(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let issues: Vec<IssueLocation> = serde_json::from_str(&raw).map_err(|e| {
            CivicRouteError::issue_source(format!("cannot parse {}: {e}", self.path.display()))
        })?;

        info!("Loaded {} issues from {}", issues.len(), self.path.display());
        Ok(issues)
    }
}

/// Built-in demo data: three open issues around Chennai
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleIssues;

impl IssueSource for SampleIssues {
    fn load_issues(&self) -> Result<Vec<IssueLocation>> {
        let now = Utc::now();

        let mut pothole = IssueLocation::new(
            "ISS001",
            Coordinate::new(13.0827, 80.2707)?,
            Priority::High,
            Status::InProgress,
        )
        .with_type("Potholes")
        .with_address("Sriperumbudur, Kanchipuram, Tamil Nadu, 603202, India")
        .with_capture(Some(15.0), "GPS Satellite");
        pothole.description =
            Some("Large pothole on Main Street causing traffic issues and vehicle damage".to_string());
        pothole.reported_at = Some(now - TimeDelta::days(2));

        let mut light = IssueLocation::new(
            "ISS002",
            Coordinate::new(13.0569, 80.2471)?,
            Priority::Medium,
            Status::Acknowledged,
        )
        .with_type("Street Lights")
        .with_address("T. Nagar, Chennai, Tamil Nadu, 600017, India")
        .with_capture(Some(23.0), "Network/WiFi");
        light.description =
            Some("Street light not working on Oak Avenue - safety concern for pedestrians".to_string());
        light.reported_at = Some(now - TimeDelta::days(1));

        let mut garbage = IssueLocation::new(
            "ISS003",
            Coordinate::new(13.0445, 80.2590)?,
            Priority::Emergency,
            Status::Submitted,
        )
        .with_type("Garbage/Waste")
        .with_address("Velachery, Chennai, Tamil Nadu, 600042, India")
        .with_capture(Some(8.0), "GPS Satellite");
        garbage.description =
            Some("Overflowing garbage bin needs immediate attention - health hazard".to_string());
        garbage.reported_at = Some(now - TimeDelta::hours(3));

        Ok(vec![pothole, light, garbage])
    }
}
