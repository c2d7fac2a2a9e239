//! Map click event source.
//!
//! Stand-in for the map library's click events. It holds at most one active
//! subscription; the mounted view owns the [`ClickSubscription`] and dropping
//! it unsubscribes.

use patrol_core::GeoPoint;
use std::sync::{Arc, Mutex, PoisonError};

pub type ClickHandler = Arc<dyn Fn(GeoPoint) + Send + Sync>;

#[derive(Default)]
struct Slot {
    next_id: u64,
    active: Option<(u64, ClickHandler)>,
}

#[derive(Clone, Default)]
pub struct ClickSource {
    slot: Arc<Mutex<Slot>>,
}

impl ClickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler`, replacing any previous subscriber.
    pub fn subscribe(&self, handler: ClickHandler) -> ClickSubscription {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.next_id += 1;
        let id = slot.next_id;
        if slot.active.replace((id, handler)).is_some() {
            tracing::debug!("Replaced existing map click subscription");
        }
        ClickSubscription {
            id,
            slot: Arc::clone(&self.slot),
        }
    }

    /// Deliver a click. Returns whether anyone was listening.
    pub fn emit(&self, point: GeoPoint) -> bool {
        let handler = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .as_ref()
            .map(|(_, handler)| Arc::clone(handler));
        match handler {
            Some(handler) => {
                handler(point);
                true
            }
            None => false,
        }
    }

    pub fn has_subscriber(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .is_some()
    }
}

pub struct ClickSubscription {
    id: u64,
    slot: Arc<Mutex<Slot>>,
}

impl Drop for ClickSubscription {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        // A newer subscriber may have replaced us already
        if matches!(slot.active.as_ref(), Some((id, _)) if *id == self.id) {
            slot.active = None;
        }
    }
}
