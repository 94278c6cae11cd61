//! Error types and handling for the `CivicRoute` application

use thiserror::Error;

/// Main error type for the `CivicRoute` application
#[derive(Error, Debug)]
pub enum CivicRouteError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Issue source errors (missing or malformed issue data)
    #[error("Issue source error: {message}")]
    IssueSource { message: String },

    /// Routing provider errors
    #[error("Routing error: {message}")]
    Routing { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl CivicRouteError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new issue source error
    pub fn issue_source<S: Into<String>>(message: S) -> Self {
        Self::IssueSource {
            message: message.into(),
        }
    }

    /// Create a new routing error
    pub fn routing<S: Into<String>>(message: S) -> Self {
        Self::Routing {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// True when the error was caused by bad caller input
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CivicRouteError::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CivicRouteError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            CivicRouteError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            CivicRouteError::IssueSource { .. } => {
                "Unable to load issues. Please check the issue file.".to_string()
            }
            CivicRouteError::Routing { .. } => {
                "Unable to compute route summary.".to_string()
            }
            CivicRouteError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            CivicRouteError::General { message } => message.clone(),
        }
    }
}
