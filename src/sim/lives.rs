//! Player lives, driven by `Lost` events

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::events::{BallEvent, EventBus, Subscription};

/// Remaining lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lives {
    remaining: i32,
}

impl Lives {
    pub fn new(start: i32) -> Self {
        Self { remaining: start }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn is_depleted(&self) -> bool {
        self.remaining <= 0
    }

    pub fn apply(&mut self, delta: i32) {
        self.remaining = self.remaining.saturating_add(delta);
        log::info!("Lives: {} ({:+})", self.remaining, delta);
    }

    /// Subscribe `this` to `Lost` events on `bus`
    pub fn attach(this: &Rc<RefCell<Lives>>, bus: &Rc<EventBus>) -> Subscription {
        let weak: Weak<RefCell<Lives>> = Rc::downgrade(this);
        bus.attach(move |event| {
            if let BallEvent::Lost { delta } = *event {
                let Some(lives) = weak.upgrade() else {
                    log::debug!("Lost event after lives were dropped");
                    return;
                };
                match lives.try_borrow_mut() {
                    Ok(mut lives) => lives.apply(delta),
                    Err(_) => log::warn!("Lives busy, dropped delta {}", delta),
                };
            }
        })
    }
}

impl Default for Lives {
    fn default() -> Self {
        Self::new(3)
    }
}
