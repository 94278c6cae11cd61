//! Configuration management for the `CivicRoute` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::CivicRouteError;
use crate::models::Priority;
use crate::region::{RegionBox, default_regions};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `CivicRoute` application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CivicRouteConfig {
    /// Route planning settings
    pub routing: RoutingConfig,
    /// Where issues are loaded from
    pub issues: IssuesConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Region table used for location classification, in lookup order
    pub regions: Vec<RegionBox>,
}

/// Route planning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Average travel speed used for time estimates
    #[serde(default = "default_average_speed")]
    pub average_speed_kmh: f64,
    /// Priorities included when a route request names none
    #[serde(default = "default_priorities")]
    pub default_priorities: Vec<Priority>,
}

/// Issue source settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuesConfig {
    /// JSON issue file; built-in sample issues are used when unset
    pub file: Option<PathBuf>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_average_speed() -> f64 {
    30.0
}

fn default_priorities() -> Vec<Priority> {
    vec![Priority::Medium, Priority::High, Priority::Emergency]
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: default_average_speed(),
            default_priorities: default_priorities(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for CivicRouteConfig {
    fn default() -> Self {
        Self {
            routing: RoutingConfig::default(),
            issues: IssuesConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            regions: default_regions(),
        }
    }
}

impl CivicRouteConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|p| p.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. CIVICROUTE_ROUTING__AVERAGE_SPEED_KMH=25
        builder = builder.add_source(
            Environment::with_prefix("CIVICROUTE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("routing.default_priorities")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CivicRouteConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("civicroute").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.routing.average_speed_kmh == 0.0 {
            self.routing.average_speed_kmh = default_average_speed();
        }
        if self.routing.default_priorities.is_empty() {
            self.routing.default_priorities = default_priorities();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.regions.is_empty() {
            self.regions = default_regions();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_regions()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let speed = self.routing.average_speed_kmh;
        if !speed.is_finite() || speed <= 0.0 || speed > 200.0 {
            return Err(CivicRouteError::config(format!(
                "Average speed must be within (0, 200] km/h, got {speed}"
            ))
            .into());
        }

        if self.server.port == 0 {
            return Err(CivicRouteError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CivicRouteError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CivicRouteError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    /// Validate the region table
    fn validate_regions(&self) -> Result<()> {
        for region in &self.regions {
            let lat = region.latitude;
            let lng = region.longitude;

            if lat.min > lat.max || lng.min > lng.max {
                return Err(CivicRouteError::config(format!(
                    "Region '{}' has min greater than max",
                    region.name
                ))
                .into());
            }

            if lat.min < -90.0 || lat.max > 90.0 || lng.min < -180.0 || lng.max > 180.0 {
                return Err(CivicRouteError::config(format!(
                    "Region '{}' extends outside valid coordinates",
                    region.name
                ))
                .into());
            }

            if region.addresses.is_empty() {
                return Err(CivicRouteError::config(format!(
                    "Region '{}' has no addresses",
                    region.name
                ))
                .into());
            }
        }

        Ok(())
    }
}
