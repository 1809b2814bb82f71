//! Error handling for the Hakai runtime
//!
//! Component crates define their own error enums (`ConfigError`,
//! `DiscoveryError`, ...) and convert into `HakaiError` at the boundary
//! where failures from different components are aggregated, e.g. the
//! startup report.

use thiserror::Error;

/// Result type alias for convenience
pub type HakaiResult<T> = Result<T, HakaiError>;

/// Umbrella error type used where component failures meet
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HakaiError {
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Schema error: {message}")]
    Schema { message: String },

    #[error("Discovery error: {message}")]
    Discovery { message: String },

    #[error("Discovery deadline exceeded: {message}")]
    DiscoveryTimeout { message: String },

    #[error("Configuration binding failed for '{plugin}': {message}")]
    ConfigBinding { plugin: String, message: String },

    #[error("Construction failed for '{plugin}': {message}")]
    Construction { plugin: String, message: String },

    #[error("Event dispatch reported {count} handler failure(s)")]
    Dispatch { count: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl HakaiError {
    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a new discovery error
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }

    /// Create a new discovery timeout error
    pub fn discovery_timeout(message: impl Into<String>) -> Self {
        Self::DiscoveryTimeout {
            message: message.into(),
        }
    }

    /// Create a new configuration binding error
    pub fn config_binding(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigBinding {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Create a new construction error
    pub fn construction(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
