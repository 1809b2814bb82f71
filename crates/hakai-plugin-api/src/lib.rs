//! Core Plugin API for the Hakai runtime
//!
//! This crate defines the foundational traits and types for implementing
//! gameplay plugins. Each extension contract ("effects", "audio", ...)
//! is a stable name plus the shared [`GamePlugin`] operations; concrete
//! plugin crates implement the trait and self-register a descriptor with
//! the [`hakai_plugin!`] macro so the runtime can discover them without
//! compile-time coupling.
//!
//! # Architecture
//!
//! A plugin crate is a self-contained module with its own:
//! - configuration schema, declared as a static [`ConfigField`] slice
//! - event subscriptions, declared as a static [`EventKind`] slice
//! - factory function producing a boxed instance
//!
//! The runtime validates the declared schema against the loaded
//! configuration document before the factory ever runs, so a plugin's
//! `configure` only sees values of the declared shape.

use hakai_events::{EffectCategory, EventBus, EventKind, GameEvent};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod descriptor;

pub use config::{ConfigField, FieldKind, PluginConfig};
pub use descriptor::{iter_plugins, PluginDescriptor};

// Re-export for the registration macro.
pub use inventory;

// ============================================================================
// Error Types
// ============================================================================

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur inside plugin code
#[derive(Debug, Clone, thiserror::Error)]
pub enum PluginError {
    /// A declared configuration field was absent
    #[error("Missing configuration field: {field}")]
    MissingField { field: String },

    /// A configuration field held a value of the wrong shape
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// The plugin cannot perform the requested operation
    #[error("Operation not supported: {operation}")]
    NotSupported { operation: String },

    /// Internal plugin error
    #[error("Internal plugin error: {message}")]
    Internal { message: String },
}

impl PluginError {
    /// Create a missing-field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid-field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not-supported error
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ============================================================================
// Core Plugin Trait
// ============================================================================

/// Core gameplay plugin trait
///
/// Implementations are owned by the capability registry for their whole
/// lifetime; the runtime only hands out short borrows for the duration
/// of a dispatch. `configure` and `on_init` run once during startup, in
/// that order, before any event is delivered.
pub trait GamePlugin: Send {
    /// Stable name of the concrete type, unique within its contract.
    fn type_name(&self) -> &'static str;

    /// Name of the extension contract this plugin implements.
    fn contract(&self) -> &'static str;

    /// Bind validated configuration values.
    ///
    /// The runtime has already checked the declared schema, so required
    /// fields are present and type-compatible when this runs.
    fn configure(&mut self, _config: &PluginConfig) -> PluginResult<()> {
        Ok(())
    }

    /// Optional initialization hook, called after `configure`.
    ///
    /// Receives the bus handle so plugins that produce follow-up events
    /// can keep a clone for publishing during dispatch.
    fn on_init(&mut self, _bus: &Arc<EventBus>) -> PluginResult<()> {
        Ok(())
    }

    /// Event kinds this plugin wants delivered to [`Self::handle_event`].
    fn subscriptions(&self) -> &'static [EventKind];

    /// React to one event.
    ///
    /// A returned error is reported in the aggregated dispatch result
    /// and never prevents delivery to other subscribers.
    fn handle_event(&mut self, event: &GameEvent) -> PluginResult<()>;

    /// Get the timed-effect capability if this plugin provides one
    fn timed_effect(&self) -> Option<&dyn TimedEffect> {
        None
    }

    /// Enable downcasting to concrete plugin types
    fn as_any(&self) -> &dyn Any;
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Capability for effects that apply for a bounded time and carry a
/// visual category.
///
/// Mirrors the shape of timed power-ups: a duration of `None` means the
/// effect is instant or permanent and needs no expiry bookkeeping.
pub trait TimedEffect {
    /// How long the effect stays applied, `None` for instant/permanent.
    fn duration(&self) -> Option<Duration>;

    /// Whether the effect is rendered as a power-up or a malus.
    fn category(&self) -> EffectCategory;
}

#[cfg(test)]
mod tests {
    use super::*;
    use hakai_events::EntityId;

    struct ProbePlugin {
        seen: usize,
    }

    impl GamePlugin for ProbePlugin {
        fn type_name(&self) -> &'static str {
            "probe"
        }

        fn contract(&self) -> &'static str {
            "test-probes"
        }

        fn subscriptions(&self) -> &'static [EventKind] {
            &[EventKind::BrickHit]
        }

        fn handle_event(&mut self, _event: &GameEvent) -> PluginResult<()> {
            self.seen += 1;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn default_hooks_are_noops() {
        let mut plugin = ProbePlugin { seen: 0 };
        assert!(plugin.configure(&PluginConfig::empty()).is_ok());
        assert!(plugin.on_init(&Arc::new(EventBus::new())).is_ok());
        assert!(plugin.timed_effect().is_none());
    }

    #[test]
    fn downcast_through_as_any() {
        let mut plugin = ProbePlugin { seen: 0 };
        plugin
            .handle_event(&GameEvent::BrickHit { brick: EntityId(1) })
            .unwrap();
        let concrete = plugin.as_any().downcast_ref::<ProbePlugin>().unwrap();
        assert_eq!(concrete.seen, 1);
    }
}
