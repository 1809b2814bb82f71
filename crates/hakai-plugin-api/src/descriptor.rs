//! Static plugin registration
//!
//! Plugins register by submitting a [`PluginDescriptor`] to the
//! `inventory` collection at link time through the [`hakai_plugin!`]
//! macro. There is no runtime scan of the filesystem or of loaded
//! libraries: a plugin that is not linked into the binary simply does
//! not exist, and registration mistakes surface when the program links,
//! not when it starts.

use crate::config::ConfigField;
use crate::GamePlugin;
use std::fmt;

/// Describes one discoverable plugin implementation.
///
/// Created by the `hakai_plugin!` macro and collected at link time by
/// the `inventory` crate; read-only afterward.
pub struct PluginDescriptor {
    /// Name of the extension contract the plugin implements.
    pub contract: &'static str,
    /// Concrete type identifier, unique within the contract.
    pub type_name: &'static str,
    /// Declared configuration schema for the plugin's sub-document.
    pub schema: &'static [ConfigField],
    /// Factory producing a fresh, unconfigured instance.
    pub factory: fn() -> Box<dyn GamePlugin>,
}

impl PluginDescriptor {
    /// The `(contract, type_name)` identity used for idempotent
    /// registration and deterministic ordering.
    pub fn key(&self) -> (&'static str, &'static str) {
        (self.contract, self.type_name)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("contract", &self.contract)
            .field("type_name", &self.type_name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

// Collect all plugin descriptors into a static collection.
inventory::collect!(PluginDescriptor);

/// Returns an iterator over all registered plugin descriptors.
///
/// Iteration order is whatever the linker produced; callers that need
/// determinism sort by [`PluginDescriptor::key`].
pub fn iter_plugins() -> impl Iterator<Item = &'static PluginDescriptor> {
    inventory::iter::<PluginDescriptor>.into_iter()
}

/// A macro for plugins to register themselves.
///
/// Creates and submits a `PluginDescriptor`, making the plugin
/// discoverable by the runtime:
///
/// ```ignore
/// hakai_plugin! {
///     contract: "effects",
///     type_name: "paddle_expand",
///     schema: PaddleExpandPlugin::SCHEMA,
///     factory: PaddleExpandPlugin::boxed
/// }
/// ```
#[macro_export]
macro_rules! hakai_plugin {
    (
        contract: $contract:expr,
        type_name: $type_name:expr,
        schema: $schema:expr,
        factory: $factory:expr
    ) => {
        $crate::inventory::submit! {
            $crate::PluginDescriptor {
                contract: $contract,
                type_name: $type_name,
                schema: $schema,
                factory: $factory,
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigField, FieldKind};
    use crate::{PluginConfig, PluginResult};
    use hakai_events::{EventKind, GameEvent};
    use std::any::Any;

    struct MacroProbePlugin;

    impl MacroProbePlugin {
        const SCHEMA: &'static [ConfigField] =
            &[ConfigField::optional("enabled", FieldKind::Bool)];

        fn boxed() -> Box<dyn GamePlugin> {
            Box::new(Self)
        }
    }

    impl GamePlugin for MacroProbePlugin {
        fn type_name(&self) -> &'static str {
            "macro_probe"
        }

        fn contract(&self) -> &'static str {
            "api-self-test"
        }

        fn subscriptions(&self) -> &'static [EventKind] {
            &[]
        }

        fn handle_event(&mut self, _event: &GameEvent) -> PluginResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    hakai_plugin! {
        contract: "api-self-test",
        type_name: "macro_probe",
        schema: MacroProbePlugin::SCHEMA,
        factory: MacroProbePlugin::boxed
    }

    #[test]
    fn macro_submission_is_discoverable() {
        let descriptor = iter_plugins()
            .find(|d| d.key() == ("api-self-test", "macro_probe"))
            .expect("macro submission should be collected");
        assert_eq!(descriptor.schema.len(), 1);

        let mut instance = (descriptor.factory)();
        assert_eq!(instance.type_name(), "macro_probe");
        assert_eq!(instance.contract(), descriptor.contract);
        assert!(instance.configure(&PluginConfig::empty()).is_ok());
    }
}
