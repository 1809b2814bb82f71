//! Configuration management for the Hakai runtime
//!
//! Loads the declarative YAML configuration into two views: the raw
//! [`ConfigDocument`] tree the plugin instantiator binds sub-documents
//! from, and the typed [`AppConfig`] the application shell uses for
//! ambient settings (logging). Level descriptors share the same loader.

pub mod document;
pub mod level;
pub mod logging;
pub mod settings;

pub use document::ConfigDocument;
pub use level::{BrickTypeData, LayoutData, LevelData, PowerUpData};
pub use settings::{AppConfig, LogFormat, LoggingConfig};

use thiserror::Error;

/// Errors produced while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The source is not well-formed YAML
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The source is valid YAML but violates the expected document shape
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// The source could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for hakai_foundation::HakaiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Parse { message } => hakai_foundation::HakaiError::Parse { message },
            ConfigError::Schema { message } => hakai_foundation::HakaiError::Schema { message },
            ConfigError::Io(err) => hakai_foundation::HakaiError::Io(err),
        }
    }
}
