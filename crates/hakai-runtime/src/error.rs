//! Runtime error types

use thiserror::Error;

/// Errors produced by the discovery engine.
///
/// Discovery walks a compiled-in static registry, so the scan-time I/O
/// failures a dynamic loader would report become link-time failures
/// here; what remains is the caller-supplied deadline.
#[derive(Error, Debug, Clone)]
pub enum DiscoveryError {
    /// The caller-supplied deadline expired mid-scan.
    #[error("discovery deadline exceeded after {confirmed} confirmed descriptor(s)")]
    Timeout { confirmed: usize },
}

/// Errors produced while instantiating one plugin.
#[derive(Error, Debug)]
pub enum InstantiationError {
    /// A declared configuration field was missing or mistyped.
    #[error("configuration binding failed for '{type_name}': {message}")]
    ConfigBinding { type_name: String, message: String },

    /// The factory, `configure`, or `on_init` failed.
    #[error("construction failed for '{type_name}': {message}")]
    Construction { type_name: String, message: String },
}

impl InstantiationError {
    pub fn config_binding(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigBinding {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

impl From<DiscoveryError> for hakai_foundation::HakaiError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::Timeout { .. } => {
                hakai_foundation::HakaiError::discovery_timeout(err.to_string())
            }
        }
    }
}

impl From<InstantiationError> for hakai_foundation::HakaiError {
    fn from(err: InstantiationError) -> Self {
        match err {
            InstantiationError::ConfigBinding { type_name, message } => {
                hakai_foundation::HakaiError::config_binding(type_name, message)
            }
            InstantiationError::Construction { type_name, message } => {
                hakai_foundation::HakaiError::construction(type_name, message)
            }
        }
    }
}
