//! Plugin runtime for Hakai
//!
//! Orchestrates the startup pipeline: discover plugin descriptors from
//! the static inventory, register them in the capability registry,
//! instantiate and configure each one from the loaded configuration
//! document, and wire the instances into the event bus. Startup-phase
//! failures are collected into an aggregate [`StartupReport`] instead of
//! aborting on the first bad plugin.

pub mod bootstrap;
pub mod discovery;
pub mod error;
pub mod instantiate;
pub mod registry;
pub mod report;

pub use bootstrap::{Bootstrap, Runtime};
pub use discovery::{DescriptorScan, DiscoveryEngine};
pub use error::{DiscoveryError, InstantiationError};
pub use instantiate::{instantiate, instantiate_all};
pub use registry::{CapabilityRegistry, PluginInstance};
pub use report::{InstanceSummary, StartupFailure, StartupReport};
