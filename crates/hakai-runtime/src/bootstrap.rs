//! Runtime bootstrap
//!
//! The composition root of the plugin runtime: wires discovery,
//! registration and instantiation together and hands the caller a live
//! [`Runtime`] plus the aggregate [`StartupReport`]. Bootstrap never
//! aborts on a bad plugin; the report carries every failure.

use crate::discovery::DiscoveryEngine;
use crate::instantiate::instantiate_all;
use crate::registry::CapabilityRegistry;
use crate::report::{InstanceSummary, StartupFailure, StartupReport};
use chrono::Utc;
use hakai_config::ConfigDocument;
use hakai_events::EventBus;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// The live runtime: the bus handle the application shell talks to and
/// the registry owning every plugin instance.
pub struct Runtime {
    bus: Arc<EventBus>,
    registry: CapabilityRegistry,
}

impl Runtime {
    /// The bus handle for publishing domain events and subscribing
    /// shell callbacks.
    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.registry
    }

    /// Unload all plugins and drop the runtime.
    pub fn shutdown(mut self) {
        self.registry.shutdown();
    }
}

/// Builder for one bootstrap pass.
pub struct Bootstrap {
    contracts: Vec<&'static str>,
    discovery_deadline: Option<Duration>,
}

impl Bootstrap {
    /// Bootstrap over an application-supplied contract set.
    pub fn new(contracts: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            contracts: contracts.into_iter().collect(),
            discovery_deadline: None,
        }
    }

    /// Bound the discovery scan by a deadline.
    pub fn with_discovery_deadline(mut self, deadline: Duration) -> Self {
        self.discovery_deadline = Some(deadline);
        self
    }

    /// Run the startup pipeline.
    ///
    /// Always returns a usable runtime; partial failure is reported, not
    /// propagated. On a discovery timeout the registry keeps only the
    /// descriptors confirmed before the deadline.
    pub fn run(self, config: &ConfigDocument) -> (Runtime, StartupReport) {
        let started_at = Utc::now();
        let clock = Instant::now();

        let bus = Arc::new(EventBus::new());
        let mut registry = CapabilityRegistry::new(bus.clone(), self.contracts.iter().copied());

        let mut engine = DiscoveryEngine::new(self.contracts.iter().copied());
        if let Some(deadline) = self.discovery_deadline {
            engine = engine.with_deadline(deadline);
        }

        let mut failures = Vec::new();
        let mut discovered = 0usize;
        let mut discovery_incomplete = false;
        for result in engine.scan() {
            match result {
                Ok(descriptor) => {
                    discovered += 1;
                    registry.register(descriptor);
                }
                Err(err) => {
                    warn!(%err, "Discovery ended early; continuing with confirmed descriptors");
                    discovery_incomplete = true;
                    failures.push(StartupFailure {
                        contract: "*",
                        type_name: "*",
                        error: err.into(),
                    });
                }
            }
        }

        let mut instantiated = Vec::new();
        for (descriptor, result) in instantiate_all(&mut registry, config) {
            match result {
                Ok(instance) => instantiated.push(InstanceSummary {
                    contract: descriptor.contract,
                    type_name: descriptor.type_name,
                    instance,
                }),
                Err(err) => failures.push(StartupFailure {
                    contract: descriptor.contract,
                    type_name: descriptor.type_name,
                    error: err.into(),
                }),
            }
        }

        let report = StartupReport {
            started_at,
            duration: clock.elapsed(),
            discovered,
            instantiated,
            failures,
            discovery_incomplete,
        };

        info!(
            discovered = report.discovered,
            ready = report.instantiated.len(),
            failed = report.failures.len(),
            "Bootstrap complete"
        );

        (Runtime { bus, registry }, report)
    }
}
