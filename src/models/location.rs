//! Coordinate model for geographic positions

use serde::{Deserialize, Serialize};

use crate::{CivicRouteError, Result};

/// Valid latitude range in decimal degrees
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Valid longitude range in decimal degrees
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A point on the earth's surface
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out of range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that both components are finite and inside their ranges
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CivicRouteError::validation(format!(
                "coordinates must be finite numbers, got ({}, {})",
                self.latitude, self.longitude
            )));
        }

        if self.latitude < LATITUDE_RANGE.0 || self.latitude > LATITUDE_RANGE.1 {
            return Err(CivicRouteError::validation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }

        if self.longitude < LONGITUDE_RANGE.0 || self.longitude > LONGITUDE_RANGE.1 {
            return Err(CivicRouteError::validation(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }

        Ok(())
    }

    /// Whether the coordinate passes [`Coordinate::validate`]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Format as "lat, lng" with six decimals
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
