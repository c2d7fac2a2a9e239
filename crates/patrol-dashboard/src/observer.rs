//! Indirection cell for the playback observer.
//!
//! The playback timer reads the cell on every tick, so swapping the observer
//! never requires restarting the timer.

use patrol_core::GeoPoint;
use std::sync::{Arc, PoisonError, RwLock};

pub type RouteObserver = Arc<dyn Fn(GeoPoint) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ObserverCell {
    current: Arc<RwLock<Option<RouteObserver>>>,
}

impl ObserverCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, observer: RouteObserver) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_set(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Call the current observer, if any. The lock is released before the call.
    pub fn notify(&self, point: GeoPoint) -> bool {
        let observer = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match observer {
            Some(observer) => {
                observer(point);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ObserverCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverCell")
            .field("set", &self.is_set())
            .finish()
    }
}
