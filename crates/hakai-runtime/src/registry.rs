//! The capability registry
//!
//! Holds the set of known extension contracts, the descriptors
//! discovered for each, and the live plugin instances. The registry is
//! the sole owner of instance lifetime: the instantiator inserts,
//! explicit unload removes, everything else only reads. An instance's
//! bus subscriptions are torn down before the instance itself is
//! dropped, so no handler can outlive its plugin.

use hakai_events::{EventBus, Subscription};
use hakai_foundation::InstanceId;
use hakai_plugin_api::{GamePlugin, PluginDescriptor};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared handle to a live plugin behind its dispatch lock.
pub(crate) type SharedPlugin = Arc<Mutex<Box<dyn GamePlugin>>>;

/// A live, registry-owned plugin instance.
pub struct PluginInstance {
    id: InstanceId,
    descriptor: &'static PluginDescriptor,
    plugin: SharedPlugin,
    subscriptions: Vec<Subscription>,
}

impl PluginInstance {
    pub(crate) fn new(
        descriptor: &'static PluginDescriptor,
        plugin: SharedPlugin,
        subscriptions: Vec<Subscription>,
    ) -> Self {
        Self {
            id: InstanceId::new(),
            descriptor,
            plugin,
            subscriptions,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn descriptor(&self) -> &'static PluginDescriptor {
        self.descriptor
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Borrow the plugin for the duration of one closure.
    ///
    /// This is the only read access the registry hands out; the borrow
    /// cannot escape, which keeps instance ownership with the registry.
    pub fn with_plugin<R>(&self, f: impl FnOnce(&mut dyn GamePlugin) -> R) -> R {
        let mut plugin = self.plugin.lock();
        f(plugin.as_mut())
    }
}

/// Registry of contracts, discovered descriptors and live instances.
pub struct CapabilityRegistry {
    bus: Arc<EventBus>,
    contracts: BTreeSet<&'static str>,
    descriptors: BTreeMap<(&'static str, &'static str), &'static PluginDescriptor>,
    instances: Vec<PluginInstance>,
}

impl CapabilityRegistry {
    pub fn new(bus: Arc<EventBus>, contracts: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            bus,
            contracts: contracts.into_iter().collect(),
            descriptors: BTreeMap::new(),
            instances: Vec::new(),
        }
    }

    /// The bus this registry wires instances into.
    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }

    /// Whether a contract name is known to this registry.
    pub fn has_contract(&self, contract: &str) -> bool {
        self.contracts.contains(contract)
    }

    /// Register a discovered descriptor.
    ///
    /// Idempotent per `(contract, type_name)`: registering the same
    /// descriptor twice is a no-op. Returns whether the descriptor was
    /// newly added. Descriptors for unknown contracts are refused with a
    /// warning.
    pub fn register(&mut self, descriptor: &'static PluginDescriptor) -> bool {
        if !self.contracts.contains(descriptor.contract) {
            warn!(
                contract = descriptor.contract,
                type_name = descriptor.type_name,
                "Descriptor refused: contract not registered"
            );
            return false;
        }
        let newly_added = self
            .descriptors
            .insert(descriptor.key(), descriptor)
            .is_none();
        if newly_added {
            debug!(
                contract = descriptor.contract,
                type_name = descriptor.type_name,
                "Descriptor registered"
            );
        }
        newly_added
    }

    /// Registered descriptors in deterministic `(contract, type_name)`
    /// order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static PluginDescriptor> + '_ {
        self.descriptors.values().copied()
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    pub(crate) fn attach_instance(&mut self, instance: PluginInstance) -> InstanceId {
        let id = instance.id();
        debug!(
            instance = %id,
            contract = instance.descriptor().contract,
            type_name = instance.descriptor().type_name,
            subscriptions = instance.subscription_count(),
            "Plugin instance attached"
        );
        self.instances.push(instance);
        id
    }

    /// Live instances of one contract, in instantiation order.
    pub fn instances_of(&self, contract: &str) -> Vec<&PluginInstance> {
        self.instances
            .iter()
            .filter(|instance| instance.descriptor().contract == contract)
            .collect()
    }

    /// Look up a live instance by id.
    pub fn instance(&self, id: InstanceId) -> Option<&PluginInstance> {
        self.instances.iter().find(|instance| instance.id() == id)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Unload one instance.
    ///
    /// Removes the instance's subscriptions from the bus first, then
    /// drops the instance. Returns whether anything was removed.
    pub fn unregister(&mut self, id: InstanceId) -> bool {
        let Some(position) = self.instances.iter().position(|i| i.id() == id) else {
            return false;
        };
        let instance = self.instances.remove(position);
        for subscription in &instance.subscriptions {
            self.bus.unsubscribe(subscription);
        }
        info!(
            instance = %id,
            type_name = instance.descriptor().type_name,
            "Plugin instance unloaded"
        );
        true
    }

    /// Unload every instance, newest first.
    pub fn shutdown(&mut self) {
        info!(instances = self.instances.len(), "Shutting down plugins");
        while let Some(instance) = self.instances.pop() {
            for subscription in &instance.subscriptions {
                self.bus.unsubscribe(subscription);
            }
            debug!(
                type_name = instance.descriptor().type_name,
                "Plugin instance unloaded"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hakai_events::{EventKind, GameEvent};
    use hakai_plugin_api::{hakai_plugin, PluginResult};
    use pretty_assertions::assert_eq;
    use std::any::Any;

    struct CountingPlugin;

    impl CountingPlugin {
        fn boxed() -> Box<dyn GamePlugin> {
            Box::new(Self)
        }
    }

    impl GamePlugin for CountingPlugin {
        fn type_name(&self) -> &'static str {
            "counting"
        }

        fn contract(&self) -> &'static str {
            "registry-test"
        }

        fn subscriptions(&self) -> &'static [EventKind] {
            &[EventKind::PaddleHit]
        }

        fn handle_event(&mut self, _event: &GameEvent) -> PluginResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    hakai_plugin! {
        contract: "registry-test",
        type_name: "counting",
        schema: &[],
        factory: CountingPlugin::boxed
    }

    fn find_descriptor() -> &'static PluginDescriptor {
        hakai_plugin_api::iter_plugins()
            .find(|d| d.key() == ("registry-test", "counting"))
            .unwrap()
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry =
            CapabilityRegistry::new(Arc::new(EventBus::new()), ["registry-test"]);
        let descriptor = find_descriptor();

        assert!(registry.register(descriptor));
        assert!(!registry.register(descriptor));
        assert_eq!(registry.descriptor_count(), 1);
    }

    #[test]
    fn unknown_contract_is_refused() {
        let mut registry = CapabilityRegistry::new(Arc::new(EventBus::new()), ["rendering"]);
        assert!(!registry.register(find_descriptor()));
        assert_eq!(registry.descriptor_count(), 0);
    }

    #[test]
    fn unregister_removes_bus_subscriptions() {
        let bus = Arc::new(EventBus::new());
        let mut registry = CapabilityRegistry::new(bus.clone(), ["registry-test"]);
        let descriptor = find_descriptor();

        let plugin: SharedPlugin = Arc::new(Mutex::new((descriptor.factory)()));
        let subscription = bus.subscribe(EventKind::PaddleHit, |_| Ok(()));
        let id = registry.attach_instance(PluginInstance::new(
            descriptor,
            plugin,
            vec![subscription],
        ));

        assert_eq!(bus.subscriber_count(EventKind::PaddleHit), 1);
        assert_eq!(registry.instances_of("registry-test").len(), 1);

        assert!(registry.unregister(id));
        assert_eq!(bus.subscriber_count(EventKind::PaddleHit), 0);
        assert_eq!(registry.instance_count(), 0);
        // Unloading twice is a no-op.
        assert!(!registry.unregister(id));
    }
}
