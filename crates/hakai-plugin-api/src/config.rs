//! Declared configuration schemas and the per-plugin value view
//!
//! A plugin descriptor carries a static [`ConfigField`] slice describing
//! the fields its sub-document may contain. The runtime validates the
//! loaded document against that schema before instantiation; the plugin
//! then reads its values through [`PluginConfig`] accessors.

use crate::{PluginError, PluginResult};
use serde_yaml::{Mapping, Value};

/// Expected shape of one configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    String,
}

impl FieldKind {
    /// Whether a YAML value is compatible with this kind.
    ///
    /// Integers are accepted where floats are expected, matching what
    /// hand-written YAML actually contains (`duration_secs: 10`).
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Bool => value.is_bool(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_f64() || value.is_i64() || value.is_u64(),
            FieldKind::String => value.is_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::String => "string",
        }
    }
}

/// One declared configuration field.
#[derive(Debug, Clone, Copy)]
pub struct ConfigField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl ConfigField {
    /// Declare a required field.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// Declare an optional field.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// The validated configuration sub-document handed to one plugin.
///
/// Read-only view; absent optional fields read as `None` so plugins can
/// fall back to their built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    fields: Mapping,
}

impl PluginConfig {
    /// An empty configuration, used when a plugin has no sub-document.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_mapping(fields: Mapping) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_i64)
    }

    /// Read a float field; integer YAML values widen.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.value(name)
            .and_then(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64)))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Read a required float field.
    ///
    /// Plugins only call this for fields their schema marks required, so
    /// a miss means the runtime's validation and the plugin disagree —
    /// still reported as an error rather than a panic.
    pub fn require_f64(&self, name: &str) -> PluginResult<f64> {
        self.get_f64(name)
            .ok_or_else(|| PluginError::missing_field(name))
    }

    pub fn require_bool(&self, name: &str) -> PluginResult<bool> {
        self.get_bool(name)
            .ok_or_else(|| PluginError::missing_field(name))
    }

    pub fn require_str(&self, name: &str) -> PluginResult<&str> {
        self.get_str(name)
            .ok_or_else(|| PluginError::missing_field(name))
    }
}
