//! Foundation types for the Hakai plugin runtime
//!
//! Layer 0 of the workspace: the umbrella error taxonomy and the shared
//! identifier types. Every other crate depends on this one; this crate
//! depends on nothing internal.

pub mod error;
pub mod id;

pub use error::{HakaiError, HakaiResult};
pub use id::InstanceId;
