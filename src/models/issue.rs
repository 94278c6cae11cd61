//! Issue model: reported civic issues as seen by field dispatch

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::CivicRouteError;

/// Urgency assigned to an issue report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Emergency,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Emergency,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CivicRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                CivicRouteError::validation(format!(
                    "unknown priority '{trimmed}', expected one of Low, Medium, High, Emergency"
                ))
            })
    }
}

/// Lifecycle state of an issue report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Submitted,
    Acknowledged,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Resolved,
}

impl Status {
    /// Resolved issues no longer need a field visit
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Status::Resolved)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Submitted => "Submitted",
            Status::Acknowledged => "Acknowledged",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CivicRouteError;

    /// Accepts the display names plus "InProgress" and "in-progress"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |value: &str| -> String {
            value
                .chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = squash(s);
        [
            Status::Submitted,
            Status::Acknowledged,
            Status::InProgress,
            Status::Resolved,
        ]
        .into_iter()
        .find(|status| squash(status.as_str()) == wanted)
        .ok_or_else(|| {
            CivicRouteError::validation(format!(
                "unknown status '{}', expected one of Submitted, Acknowledged, In Progress, Resolved",
                s.trim()
            ))
        })
    }
}

/// An issue report with the fields route planning reads.
///
/// The surrounding application owns these records; planning code only borrows them.
/// On the wire the coordinate and its capture details (address, accuracy, method)
/// live together under `location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IssueRecord", into = "IssueRecord")]
pub struct IssueLocation {
    pub id: String,
    pub coordinate: Coordinate,
    pub priority: Priority,
    pub status: Status,
    /// Issue category such as "Potholes"
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    /// Reported position accuracy in meters
    pub accuracy_m: Option<f64>,
    /// How the position was captured, e.g. "GPS Satellite"
    pub location_method: Option<String>,
    pub department: Option<String>,
    pub reported_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize)]
struct IssueRecord {
    id: String,
    location: LocationRecord,
    priority: Priority,
    status: Status,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    issue_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    // older exports kept the address beside the location
    #[serde(default, skip_serializing)]
    address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    #[serde(rename = "timestamp", default, skip_serializing_if = "Option::is_none")]
    reported_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize)]
struct LocationRecord {
    #[serde(flatten)]
    coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
}

impl From<IssueRecord> for IssueLocation {
    fn from(record: IssueRecord) -> Self {
        Self {
            id: record.id,
            coordinate: record.location.coordinate,
            priority: record.priority,
            status: record.status,
            issue_type: record.issue_type,
            description: record.description,
            address: record.location.address.or(record.address),
            accuracy_m: record.location.accuracy,
            location_method: record.location.method,
            department: record.department,
            reported_at: record.reported_at,
        }
    }
}

impl From<IssueLocation> for IssueRecord {
    fn from(issue: IssueLocation) -> Self {
        Self {
            id: issue.id,
            location: LocationRecord {
                coordinate: issue.coordinate,
                address: issue.address,
                accuracy: issue.accuracy_m,
                method: issue.location_method,
            },
            priority: issue.priority,
            status: issue.status,
            issue_type: issue.issue_type,
            description: issue.description,
            address: None,
            department: issue.department,
            reported_at: issue.reported_at,
        }
    }
}

impl IssueLocation {
    /// Create an issue with only the routing fields set
    #[must_use]
    pub fn new<S: Into<String>>(
        id: S,
        coordinate: Coordinate,
        priority: Priority,
        status: Status,
    ) -> Self {
        Self {
            id: id.into(),
            coordinate,
            priority,
            status,
            issue_type: None,
            description: None,
            address: None,
            accuracy_m: None,
            location_method: None,
            department: None,
            reported_at: None,
        }
    }

    /// Set the issue category and derive the responsible department
    #[must_use]
    pub fn with_type<S: Into<String>>(mut self, issue_type: S) -> Self {
        let issue_type = issue_type.into();
        self.department = Some(department_for(&issue_type).to_string());
        self.issue_type = Some(issue_type);
        self
    }

    #[must_use]
    pub fn with_address<S: Into<String>>(mut self, address: S) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Record how the position was captured
    #[must_use]
    pub fn with_capture<S: Into<String>>(mut self, accuracy_m: Option<f64>, method: S) -> Self {
        self.accuracy_m = accuracy_m;
        self.location_method = Some(method.into());
        self
    }

    /// Department on record, or the one derived from the category
    #[must_use]
    pub fn department_name(&self) -> &str {
        self.department
            .as_deref()
            .unwrap_or_else(|| department_for(self.display_type()))
    }

    /// Reject records that routing code must never see: empty ids and bad coordinates
    pub fn validate(&self) -> crate::Result<()> {
        if self.id.trim().is_empty() {
            return Err(CivicRouteError::validation("issue id cannot be empty"));
        }
        self.coordinate
            .validate()
            .map_err(|e| CivicRouteError::validation(format!("issue {}: {e}", self.id)))
    }

    /// Category for display, falling back to "Issue"
    #[must_use]
    pub fn display_type(&self) -> &str {
        self.issue_type.as_deref().unwrap_or("Issue")
    }
}

/// Department that handles a given issue category
#[must_use]
pub fn department_for(issue_type: &str) -> &'static str {
    match issue_type {
        "Potholes" | "Street Lights" | "Road Damage" => "Public Works",
        "Garbage/Waste" => "Sanitation Department",
        "Water Issues" => "Water Authority",
        "Traffic Signals" => "Traffic Management",
        "Parks & Recreation" => "Parks Department",
        "Public Safety" => "Public Safety",
        _ => "General Services",
    }
}

/// Dashboard list filter; an unset field matches everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFilter {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl IssueFilter {
    #[must_use]
    pub fn matches(&self, issue: &IssueLocation) -> bool {
        self.status.is_none_or(|status| issue.status == status)
            && self.priority.is_none_or(|priority| issue.priority == priority)
    }

    /// Keep the matching issues in their original order
    #[must_use]
    pub fn apply(&self, issues: Vec<IssueLocation>) -> Vec<IssueLocation> {
        issues.into_iter().filter(|issue| self.matches(issue)).collect()
    }
}

/// Dashboard counters over an issue list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    pub total: usize,
    pub submitted: usize,
    pub acknowledged: usize,
    pub in_progress: usize,
    pub resolved: usize,
    /// Count per issue category
    pub by_type: BTreeMap<String, usize>,
    /// Count per responsible department
    pub by_department: BTreeMap<String, usize>,
}

impl IssueStats {
    #[must_use]
    pub fn from_issues(issues: &[IssueLocation]) -> Self {
        issues.iter().fold(Self::default(), |mut stats, issue| {
            stats.total += 1;
            match issue.status {
                Status::Submitted => stats.submitted += 1,
                Status::Acknowledged => stats.acknowledged += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Resolved => stats.resolved += 1,
            }
            *stats
                .by_type
                .entry(issue.display_type().to_string())
                .or_default() += 1;
            *stats
                .by_department
                .entry(issue.department_name().to_string())
                .or_default() += 1;
            stats
        })
    }

    /// Issues still waiting for a field visit
    #[must_use]
    pub fn open(&self) -> usize {
        self.total - self.resolved
    }
}
