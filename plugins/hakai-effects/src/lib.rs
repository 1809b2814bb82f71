//! Effect plugins
//!
//! The concrete power-up and malus effects for the `"effects"` contract.
//! Each plugin self-registers with the runtime and reacts to
//! `PowerUpCollected` events for its own power-up kind; everything it
//! knows about the entity world travels inside the event payload.

mod paddle_expand;
mod paddle_slow;
mod spawn_ball;

pub use paddle_expand::PaddleExpandPlugin;
pub use paddle_slow::PaddleSlowPlugin;
pub use spawn_ball::SpawnBallPlugin;

/// Contract name shared by every plugin in this crate.
pub const EFFECTS_CONTRACT: &str = "effects";
