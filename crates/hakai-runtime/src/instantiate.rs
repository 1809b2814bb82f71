//! Plugin instantiation and configuration binding
//!
//! For each registered descriptor: locate the plugin's sub-document in
//! the configuration, validate it against the declared schema, construct
//! the instance, bind the values, run the optional init hook and wire
//! the instance's subscriptions into the bus. One plugin's failure never
//! aborts the pass; the caller collects per-descriptor results.

use crate::error::InstantiationError;
use crate::registry::{CapabilityRegistry, PluginInstance, SharedPlugin};
use hakai_config::ConfigDocument;
use hakai_events::HandlerError;
use hakai_foundation::InstanceId;
use hakai_plugin_api::{PluginConfig, PluginDescriptor};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Validate a plugin's sub-document against its declared schema.
fn validate_schema(
    descriptor: &PluginDescriptor,
    entry: Option<&serde_yaml::Mapping>,
) -> Result<(), InstantiationError> {
    for field in descriptor.schema {
        let value = entry.and_then(|mapping| mapping.get(field.name));
        match value {
            Some(value) => {
                if !field.kind.matches(value) {
                    return Err(InstantiationError::config_binding(
                        descriptor.type_name,
                        format!(
                            "field '{}' expects {}, found incompatible value",
                            field.name,
                            field.kind.name()
                        ),
                    ));
                }
            }
            None if field.required => {
                return Err(InstantiationError::config_binding(
                    descriptor.type_name,
                    format!("required field '{}' is missing", field.name),
                ));
            }
            None => {}
        }
    }
    Ok(())
}

/// Instantiate one descriptor and attach the instance to the registry.
pub fn instantiate(
    registry: &mut CapabilityRegistry,
    descriptor: &'static PluginDescriptor,
    config: &ConfigDocument,
) -> Result<InstanceId, InstantiationError> {
    let entry = config.plugin_entry(descriptor.contract, descriptor.type_name);
    validate_schema(descriptor, entry.as_ref())?;
    let plugin_config = entry.map(PluginConfig::from_mapping).unwrap_or_default();

    let mut plugin = (descriptor.factory)();
    if plugin.type_name() != descriptor.type_name || plugin.contract() != descriptor.contract {
        return Err(InstantiationError::construction(
            descriptor.type_name,
            format!(
                "factory produced '{}/{}' instead of the declared type",
                plugin.contract(),
                plugin.type_name()
            ),
        ));
    }

    plugin
        .configure(&plugin_config)
        .map_err(|e| InstantiationError::config_binding(descriptor.type_name, e.to_string()))?;

    let bus = registry.bus();
    plugin
        .on_init(&bus)
        .map_err(|e| InstantiationError::construction(descriptor.type_name, e.to_string()))?;

    let kinds = plugin.subscriptions();
    let shared: SharedPlugin = Arc::new(Mutex::new(plugin));
    let mut subscriptions = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let handler_plugin = shared.clone();
        let subscription = bus.subscribe_named(kind, descriptor.type_name, move |event| {
            handler_plugin
                .lock()
                .handle_event(event)
                .map_err(|e| HandlerError::new(e.to_string()))
        });
        subscriptions.push(subscription);
    }

    debug!(
        contract = descriptor.contract,
        type_name = descriptor.type_name,
        subscriptions = subscriptions.len(),
        "Plugin instantiated"
    );
    Ok(registry.attach_instance(PluginInstance::new(descriptor, shared, subscriptions)))
}

/// Instantiate every registered descriptor.
///
/// Failures are collected per descriptor; siblings of a failing plugin
/// still instantiate.
pub fn instantiate_all(
    registry: &mut CapabilityRegistry,
    config: &ConfigDocument,
) -> Vec<(
    &'static PluginDescriptor,
    Result<InstanceId, InstantiationError>,
)> {
    let descriptors: Vec<_> = registry.descriptors().collect();
    let mut results = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let result = instantiate(registry, descriptor, config);
        match &result {
            Ok(id) => info!(
                contract = descriptor.contract,
                type_name = descriptor.type_name,
                instance = %id,
                "Plugin ready"
            ),
            Err(err) => error!(
                contract = descriptor.contract,
                type_name = descriptor.type_name,
                %err,
                "Plugin instantiation failed (continuing with siblings)"
            ),
        }
        results.push((descriptor, result));
    }
    results
}
