//! The in-process publish/subscribe broker

use crate::event::{EventKind, GameEvent};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Error returned by an individual subscriber handler.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One failed handler invocation inside a dispatch.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    /// Kind of the event whose delivery failed.
    pub kind: EventKind,
    /// Id of the failing subscription.
    pub subscription: u64,
    /// Subscriber label, for diagnostics.
    pub subscriber: String,
    /// The error the handler returned.
    pub error: HandlerError,
}

/// Aggregate of every handler failure observed by one publish call.
///
/// Dispatch to the remaining subscribers always completes before this is
/// returned; the bus stays usable afterwards.
#[derive(Error, Debug)]
#[error("{} handler failure(s) during event dispatch", .failures.len())]
pub struct DispatchError {
    pub failures: Vec<HandlerFailure>,
}

/// A live binding of an event kind to a handler.
///
/// Returned by [`EventBus::subscribe`]; pass it back to
/// [`EventBus::unsubscribe`] to remove the binding. Removal is terminal.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

type Handler = Box<dyn FnMut(&GameEvent) -> Result<(), HandlerError> + Send>;

#[derive(Clone)]
struct SubscriberEntry {
    id: u64,
    label: Arc<str>,
    // Each handler gets its own lock so the bus lock is never held while
    // subscriber code runs.
    handler: Arc<Mutex<Handler>>,
}

#[derive(Default)]
struct BusState {
    subscribers: HashMap<EventKind, Vec<SubscriberEntry>>,
    queue: VecDeque<GameEvent>,
    dispatching: bool,
    next_id: u64,
}

/// Central synchronous event bus.
///
/// Publishes are serialized through a single dispatch queue: the first
/// caller to publish becomes the drainer and delivers queued events one
/// at a time until the queue is empty; any publish arriving meanwhile
/// (from another thread, or re-entrantly from a handler) only enqueues.
/// This keeps handler execution single-file and gives re-entrant
/// publishes breadth-first ordering.
pub struct EventBus {
    state: Mutex<BusState>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BusState::default()),
        }
    }

    /// Subscribe a handler to one event kind.
    ///
    /// Handlers run in subscription-registration order.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: FnMut(&GameEvent) -> Result<(), HandlerError> + Send + 'static,
    {
        self.subscribe_named(kind, format!("handler-{kind}"), handler)
    }

    /// Subscribe with a label used in failure reports and logs.
    pub fn subscribe_named<F>(
        &self,
        kind: EventKind,
        label: impl Into<String>,
        handler: F,
    ) -> Subscription
    where
        F: FnMut(&GameEvent) -> Result<(), HandlerError> + Send + 'static,
    {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let label: Arc<str> = Arc::from(label.into());
        debug!(%kind, subscription = id, subscriber = %label, "Subscriber registered");
        state.subscribers.entry(kind).or_default().push(SubscriberEntry {
            id,
            label,
            handler: Arc::new(Mutex::new(Box::new(handler))),
        });
        Subscription { id, kind }
    }

    /// Remove a subscription.
    ///
    /// Idempotent: removing an already-removed subscription is a no-op.
    /// A removal that races with an in-flight dispatch does not affect
    /// deliveries already snapshotted for that dispatch.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        let mut state = self.state.lock();
        if let Some(entries) = state.subscribers.get_mut(&subscription.kind) {
            let before = entries.len();
            entries.retain(|entry| entry.id != subscription.id);
            if entries.len() < before {
                debug!(
                    kind = %subscription.kind,
                    subscription = subscription.id,
                    "Subscriber removed"
                );
            }
        }
    }

    /// Number of live subscriptions for one event kind.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.state
            .lock()
            .subscribers
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Publish an event.
    ///
    /// Delivers to all current subscribers of the event's kind, in
    /// subscription order, then drains any events those handlers
    /// published. Publishing with zero subscribers is a no-op.
    ///
    /// The outermost publish call on the draining thread aggregates the
    /// handler failures of everything it dispatched into one
    /// [`DispatchError`]; a publish that only enqueued (because a
    /// dispatch was already in progress) returns `Ok` and its failures
    /// surface through the draining call instead.
    pub fn publish(&self, event: GameEvent) -> Result<(), DispatchError> {
        {
            let mut state = self.state.lock();
            trace!(kind = %event.kind(), queued = state.dispatching, "Event published");
            state.queue.push_back(event);
            if state.dispatching {
                // A dispatch is already draining the queue; it will pick
                // this event up after the one in flight completes.
                return Ok(());
            }
            state.dispatching = true;
        }

        let mut failures = Vec::new();
        loop {
            let (event, snapshot) = {
                let mut state = self.state.lock();
                match state.queue.pop_front() {
                    Some(event) => {
                        let snapshot = state
                            .subscribers
                            .get(&event.kind())
                            .cloned()
                            .unwrap_or_default();
                        (event, snapshot)
                    }
                    None => {
                        state.dispatching = false;
                        break;
                    }
                }
            };

            for entry in snapshot {
                let mut handler = entry.handler.lock();
                if let Err(error) = (*handler)(&event) {
                    warn!(
                        kind = %event.kind(),
                        subscriber = %entry.label,
                        %error,
                        "Handler failed (continuing dispatch)"
                    );
                    failures.push(HandlerFailure {
                        kind: event.kind(),
                        subscription: entry.id,
                        subscriber: entry.label.to_string(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DispatchError> for hakai_foundation::HakaiError {
    fn from(err: DispatchError) -> Self {
        let message = err
            .failures
            .iter()
            .map(|f| format!("{} <- {} ({})", f.kind, f.subscriber, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        hakai_foundation::HakaiError::Dispatch {
            count: err.failures.len(),
            message,
        }
    }
}
