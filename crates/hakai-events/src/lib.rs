//! Gameplay events and the event bus
//!
//! This crate defines the closed set of gameplay events as a tagged union
//! (`GameEvent`) so that exhaustive matches in consumers are checked at
//! compile time, together with the in-process publish/subscribe broker
//! (`EventBus`) that decouples event producers from subscribers.
//!
//! # Dispatch model
//!
//! Delivery is synchronous and in-order: all current subscribers of an
//! event's kind run in subscription-registration order. A handler that
//! fails never prevents delivery to the handlers after it; every failure
//! of one publish call is aggregated into a single [`DispatchError`].
//! A handler publishing from inside a dispatch enqueues the new event
//! behind the one in flight (breadth-first ordering), so re-entrant
//! publishes cannot grow the stack or reorder deliveries.

pub mod bus;
pub mod event;

pub use bus::{DispatchError, EventBus, HandlerError, HandlerFailure, Subscription};
pub use event::{EffectCategory, EntityId, EventKind, GameEvent, PowerUpKind, PowerUpTrigger};
