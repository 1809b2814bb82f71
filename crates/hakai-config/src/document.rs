//! The raw configuration document
//!
//! Shape expected by the runtime:
//!
//! ```yaml
//! logging:
//!   level: info
//!   format: pretty
//! plugins:
//!   effects:
//!     paddle_expand:
//!       duration_secs: 10.0
//!       width_multiplier: 1.5
//!   audio:
//!     sound_cues:
//!       volume: 0.8
//! ```
//!
//! `plugins` is the one required top-level section: one sub-section per
//! extension contract, each entry keyed by concrete plugin type name.

use crate::ConfigError;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::debug;

/// Parsed, read-only configuration tree.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    root: Mapping,
}

impl ConfigDocument {
    /// Parse a configuration document from YAML text.
    ///
    /// Fails with [`ConfigError::Parse`] on malformed YAML and
    /// [`ConfigError::Schema`] when the required `plugins` section is
    /// absent or has the wrong shape.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let root: Value =
            serde_yaml::from_str(source).map_err(|e| ConfigError::parse(e.to_string()))?;
        let root = match root {
            Value::Mapping(root) => root,
            other => {
                return Err(ConfigError::schema(format!(
                    "top level must be a mapping, found {}",
                    value_kind(&other)
                )))
            }
        };

        let document = Self { root };
        document.validate()?;
        debug!(
            contracts = document.plugin_contracts().len(),
            "Configuration document loaded"
        );
        Ok(document)
    }

    /// Parse a configuration document from a file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let plugins = self
            .root
            .get("plugins")
            .ok_or_else(|| ConfigError::schema("missing required top-level section 'plugins'"))?;
        let plugins = plugins.as_mapping().ok_or_else(|| {
            ConfigError::schema("top-level section 'plugins' must be a mapping")
        })?;

        for (contract, entries) in plugins {
            let contract = contract.as_str().ok_or_else(|| {
                ConfigError::schema("contract names under 'plugins' must be strings")
            })?;
            let entries = entries.as_mapping().ok_or_else(|| {
                ConfigError::schema(format!(
                    "plugins.{contract} must map plugin type names to field mappings"
                ))
            })?;
            for (type_name, fields) in entries {
                let type_name = type_name.as_str().ok_or_else(|| {
                    ConfigError::schema(format!(
                        "plugin type names under plugins.{contract} must be strings"
                    ))
                })?;
                if !fields.is_mapping() && !fields.is_null() {
                    return Err(ConfigError::schema(format!(
                        "plugins.{contract}.{type_name} must be a mapping of field overrides"
                    )));
                }
            }
        }
        Ok(())
    }

    /// An arbitrary top-level section, if present.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Contract names that have at least one configured entry.
    pub fn plugin_contracts(&self) -> Vec<&str> {
        self.plugins_mapping()
            .map(|plugins| plugins.keys().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The field-override mapping for one plugin, if configured.
    ///
    /// An entry configured as `type_name:` (null body) reads as an empty
    /// mapping rather than an absent one.
    pub fn plugin_entry(&self, contract: &str, type_name: &str) -> Option<Mapping> {
        let entry = self.plugins_mapping()?.get(contract)?.get(type_name)?;
        match entry {
            Value::Mapping(fields) => Some(fields.clone()),
            Value::Null => Some(Mapping::new()),
            _ => None,
        }
    }

    fn plugins_mapping(&self) -> Option<&Mapping> {
        self.root.get("plugins").and_then(Value::as_mapping)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
