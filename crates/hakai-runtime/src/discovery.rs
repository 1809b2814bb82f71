//! Descriptor discovery over the static plugin inventory
//!
//! The engine filters the link-time descriptor collection down to the
//! contracts the application registered, orders it deterministically by
//! `(contract, type_name)` and drops duplicate submissions. The scan is
//! restartable (each call to [`DiscoveryEngine::scan`] starts over) and
//! must be exhausted before the registry is considered populated.

use crate::error::DiscoveryError;
use hakai_plugin_api::{iter_plugins, PluginDescriptor};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Discovers plugin descriptors for a set of extension contracts.
pub struct DiscoveryEngine {
    contracts: BTreeSet<&'static str>,
    deadline: Option<Duration>,
}

impl DiscoveryEngine {
    pub fn new(contracts: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            contracts: contracts.into_iter().collect(),
            deadline: None,
        }
    }

    /// Bound the scan by a deadline.
    ///
    /// When the deadline expires mid-scan the iterator yields
    /// [`DiscoveryError::Timeout`] and ends; descriptors already yielded
    /// stay confirmed.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The contracts this engine scans for.
    pub fn contracts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.contracts.iter().copied()
    }

    /// Start a fresh scan.
    ///
    /// Repeated scans over an unchanged binary yield descriptors in
    /// identical order. An empty result is valid: zero matches is not an
    /// error.
    pub fn scan(&self) -> DescriptorScan {
        let mut seen = BTreeSet::new();
        let mut ordered: Vec<&'static PluginDescriptor> = Vec::new();
        for descriptor in iter_plugins() {
            if !self.contracts.contains(descriptor.contract) {
                continue;
            }
            if !seen.insert(descriptor.key()) {
                warn!(
                    contract = descriptor.contract,
                    type_name = descriptor.type_name,
                    "Duplicate plugin submission skipped"
                );
                continue;
            }
            ordered.push(descriptor);
        }
        ordered.sort_unstable_by_key(|d| d.key());

        debug!(
            candidates = ordered.len(),
            contracts = self.contracts.len(),
            "Descriptor scan prepared"
        );

        DescriptorScan {
            ordered,
            index: 0,
            started: Instant::now(),
            deadline: self.deadline,
            timed_out: false,
        }
    }

    /// Exhaust a scan into an ordered descriptor list.
    pub fn discover_all(&self) -> Result<Vec<&'static PluginDescriptor>, DiscoveryError> {
        self.scan().collect()
    }
}

/// Lazy, restartable descriptor sequence produced by
/// [`DiscoveryEngine::scan`].
pub struct DescriptorScan {
    ordered: Vec<&'static PluginDescriptor>,
    index: usize,
    started: Instant,
    deadline: Option<Duration>,
    timed_out: bool,
}

impl DescriptorScan {
    /// Descriptors confirmed so far.
    pub fn confirmed(&self) -> usize {
        self.index
    }
}

impl Iterator for DescriptorScan {
    type Item = Result<&'static PluginDescriptor, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.timed_out || self.index >= self.ordered.len() {
            return None;
        }
        if let Some(deadline) = self.deadline {
            if self.started.elapsed() >= deadline {
                self.timed_out = true;
                warn!(
                    confirmed = self.index,
                    remaining = self.ordered.len() - self.index,
                    "Discovery deadline exceeded"
                );
                return Some(Err(DiscoveryError::Timeout {
                    confirmed: self.index,
                }));
            }
        }
        let descriptor = self.ordered[self.index];
        self.index += 1;
        Some(Ok(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hakai_events::{EventKind, GameEvent};
    use hakai_plugin_api::{hakai_plugin, GamePlugin, PluginResult};
    use pretty_assertions::assert_eq;
    use std::any::Any;

    macro_rules! scan_probe {
        ($struct_name:ident, $type_name:literal) => {
            struct $struct_name;

            impl $struct_name {
                fn boxed() -> Box<dyn GamePlugin> {
                    Box::new(Self)
                }
            }

            impl GamePlugin for $struct_name {
                fn type_name(&self) -> &'static str {
                    $type_name
                }

                fn contract(&self) -> &'static str {
                    "discovery-test"
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
                contract: "discovery-test",
                type_name: $type_name,
                schema: &[],
                factory: $struct_name::boxed
            }
        };
    }

    // Deliberately registered in non-lexicographic source order.
    scan_probe!(ZetaProbe, "zeta");
    scan_probe!(AlphaProbe, "alpha");
    scan_probe!(MidProbe, "mid");

    #[test]
    fn scan_is_deterministic_and_ordered() {
        let engine = DiscoveryEngine::new(["discovery-test"]);
        let first: Vec<_> = engine
            .discover_all()
            .unwrap()
            .iter()
            .map(|d| d.type_name)
            .collect();
        let second: Vec<_> = engine
            .discover_all()
            .unwrap()
            .iter()
            .map(|d| d.type_name)
            .collect();
        assert_eq!(first, vec!["alpha", "mid", "zeta"]);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_contract_yields_empty_result() {
        let engine = DiscoveryEngine::new(["rendering"]);
        assert!(engine.discover_all().unwrap().is_empty());
    }

    #[test]
    fn expired_deadline_reports_timeout() {
        // A zero deadline has always already expired by the first poll.
        let engine = DiscoveryEngine::new(["discovery-test"]).with_deadline(Duration::ZERO);
        let mut scan = engine.scan();
        match scan.next() {
            Some(Err(DiscoveryError::Timeout { confirmed })) => assert_eq!(confirmed, 0),
            other => panic!("expected timeout, got {other:?}"),
        }
        // The scan is fused after the timeout.
        assert!(scan.next().is_none());
    }

    #[test]
    fn discover_all_propagates_timeout() {
        let engine = DiscoveryEngine::new(["discovery-test"]).with_deadline(Duration::ZERO);
        assert!(matches!(
            engine.discover_all(),
            Err(DiscoveryError::Timeout { .. })
        ));
    }
}
