//! Typed ambient application settings

use crate::{ConfigDocument, ConfigError};
use serde::{Deserialize, Serialize};

/// Output format for log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Logging section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level name (trace, debug, info, warn, error).
    pub level: String,
    /// Line format; overridable at runtime via `LOG_FORMAT`.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Typed ambient settings, deserialized from the same document the
/// plugin instantiator reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Extract the typed settings from a loaded document.
    ///
    /// Absent sections fall back to defaults; a present section with the
    /// wrong shape is a schema error.
    pub fn from_document(document: &ConfigDocument) -> Result<Self, ConfigError> {
        let logging = match document.section("logging") {
            Some(value) => serde_yaml::from_value(value.clone())
                .map_err(|e| ConfigError::schema(format!("logging section: {e}")))?,
            None => LoggingConfig::default(),
        };
        Ok(Self { logging })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_logging_section_uses_defaults() {
        let doc = ConfigDocument::parse("plugins: {}\n").unwrap();
        let config = AppConfig::from_document(&doc).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn logging_section_deserializes() {
        let doc =
            ConfigDocument::parse("logging:\n  level: trace\n  format: json\nplugins: {}\n")
                .unwrap();
        let config = AppConfig::from_document(&doc).unwrap();
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn malformed_logging_section_is_a_schema_error() {
        let doc = ConfigDocument::parse("logging: 5\nplugins: {}\n").unwrap();
        let err = AppConfig::from_document(&doc).unwrap_err();
        assert!(matches!(err, ConfigError::Schema { .. }));
    }
}
