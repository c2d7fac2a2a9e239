//! Keeps the map surface sized to its container.

use patrol_core::Viewport;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::timer::{spawn_delayed, TimerHandle};

/// Calls `invalidate_size` a short settle delay after mount and after every
/// container resize. A newer resize supersedes a pending one.
pub struct MapResizer {
    viewport: Arc<dyn Viewport>,
    settle: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl MapResizer {
    pub fn mount(viewport: Arc<dyn Viewport>, settle: Duration) -> Self {
        let resizer = Self {
            viewport,
            settle,
            pending: Mutex::new(None),
        };
        resizer.on_resize();
        resizer
    }

    pub fn on_resize(&self) {
        let viewport = Arc::clone(&self.viewport);
        let timer = spawn_delayed("resize", self.settle, move || viewport.invalidate_size());
        // Replacing the previous handle aborts it
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(timer);
    }
}
