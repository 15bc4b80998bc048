//! In-process event bus
//!
//! Synchronous publish/subscribe for the three ball signals. Handlers run
//! inline, in subscription order, before `publish` returns. Single-threaded
//! by construction (`Rc`/`RefCell`), matching the fixed-step simulation.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Signals exchanged between the ball, the paddle and the rest of the game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallEvent {
    /// Request to launch the held ball at `angle_deg` (0 = straight up, positive = counter-clockwise)
    Launch { angle_deg: f32 },
    /// The ball was caught by the paddle at `position`
    Stuck { position: Vec2 },
    /// The ball crossed the lost boundary; `delta` is applied to lives
    Lost { delta: i32 },
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<RefCell<dyn FnMut(&BallEvent)>>;

/// Scoped subscription: unsubscribes when dropped
#[must_use = "dropping a Subscription unsubscribes its handler"]
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<EventBus>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribe now (same as dropping)
    pub fn detach(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<(SubscriptionId, Handler)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; it receives every event published after this call
    pub fn subscribe(&self, handler: impl FnMut(&BallEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let handler: Handler = Rc::new(RefCell::new(handler));
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Register a handler that stays subscribed for the lifetime of the returned guard
    pub fn attach(self: &Rc<Self>, handler: impl FnMut(&BallEvent) + 'static) -> Subscription {
        Subscription {
            bus: Rc::downgrade(self),
            id: self.subscribe(handler),
        }
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(sub, _)| *sub != id);
        handlers.len() != before
    }

    /// Deliver `event` to every current subscriber, in subscription order
    pub fn publish(&self, event: &BallEvent) {
        // Snapshot so handlers may subscribe, unsubscribe or publish re-entrantly
        let handlers: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();

        log::debug!("publish {:?} to {} subscribers", event, handlers.len());

        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(event),
                // Only reachable when a handler re-publishes to itself
                Err(_) => log::warn!("Skipped re-entrant delivery of {:?}", event),
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
