//! Host-side log of playback steps.

use patrol_core::GeoPoint;
use std::sync::{Arc, Mutex, PoisonError};

use crate::observer::RouteObserver;

/// Appends every playback step reported by the map view.
#[derive(Debug, Clone, Default)]
pub struct RouteHistory {
    points: Arc<Mutex<Vec<GeoPoint>>>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer to hand to [`crate::MapView::set_observer`].
    pub fn observer(&self) -> RouteObserver {
        let points = Arc::clone(&self.points);
        Arc::new(move |point| {
            points
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(point);
        })
    }

    pub fn points(&self) -> Vec<GeoPoint> {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reset(&self) {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
