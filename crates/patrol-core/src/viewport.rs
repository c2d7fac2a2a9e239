//! The narrow surface the core needs from the external map library.

use serde::Serialize;
use std::sync::{Mutex, PoisonError};

use crate::models::GeoPoint;

/// Transition options for [`Viewport::set_view`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewOptions {
    pub animate: bool,
    pub duration_secs: f64,
}

impl ViewOptions {
    /// Jump without animation.
    pub const fn immediate() -> Self {
        Self {
            animate: false,
            duration_secs: 0.0,
        }
    }

    pub const fn animated(duration_secs: f64) -> Self {
        Self {
            animate: true,
            duration_secs,
        }
    }
}

/// Map surface implemented by the rendering library.
///
/// Methods take `&self`; implementations own their interior state.
pub trait Viewport: Send + Sync {
    fn set_view(&self, center: GeoPoint, zoom: u8, opts: ViewOptions);

    fn zoom(&self) -> u8;

    /// Recompute the map's size after its container changed.
    fn invalidate_size(&self);
}

/// Zoom to use for a recenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    /// Whatever the viewport shows when the command is applied.
    Current,
    Fixed(u8),
}

/// A recenter decided by the core, applied later by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewCommand {
    pub center: GeoPoint,
    pub zoom: ZoomLevel,
    pub opts: ViewOptions,
}

impl ViewCommand {
    pub fn apply(&self, viewport: &dyn Viewport) {
        let zoom = match self.zoom {
            ZoomLevel::Current => viewport.zoom(),
            ZoomLevel::Fixed(zoom) => zoom,
        };
        viewport.set_view(self.center, zoom, self.opts);
    }
}

/// One call observed by [`RecordingViewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCall {
    SetView {
        center: GeoPoint,
        zoom: u8,
        opts: ViewOptions,
    },
    InvalidateSize,
}

/// In-memory viewport that remembers every call, for headless hosts and tests.
#[derive(Debug)]
pub struct RecordingViewport {
    zoom: Mutex<u8>,
    calls: Mutex<Vec<ViewportCall>>,
}

impl RecordingViewport {
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom: Mutex::new(zoom),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<ViewportCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain and return all calls so far.
    pub fn take_calls(&self) -> Vec<ViewportCall> {
        std::mem::take(&mut *self.calls.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// `set_view` calls only, in order.
    pub fn set_views(&self) -> Vec<(GeoPoint, u8, ViewOptions)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewportCall::SetView { center, zoom, opts } => Some((center, zoom, opts)),
                ViewportCall::InvalidateSize => None,
            })
            .collect()
    }

    pub fn invalidate_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ViewportCall::InvalidateSize))
            .count()
    }
}

impl Viewport for RecordingViewport {
    fn set_view(&self, center: GeoPoint, zoom: u8, opts: ViewOptions) {
        *self.zoom.lock().unwrap_or_else(PoisonError::into_inner) = zoom;
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ViewportCall::SetView { center, zoom, opts });
    }

    fn zoom(&self) -> u8 {
        *self.zoom.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn invalidate_size(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ViewportCall::InvalidateSize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_zoom_read_at_apply_time() {
        let viewport = RecordingViewport::new(13);
        let cmd = ViewCommand {
            center: GeoPoint::new(1.0, 2.0),
            zoom: ZoomLevel::Current,
            opts: ViewOptions::immediate(),
        };

        cmd.apply(&viewport);
        ViewCommand {
            center: GeoPoint::new(3.0, 4.0),
            zoom: ZoomLevel::Fixed(15),
            opts: ViewOptions::animated(1.0),
        }
        .apply(&viewport);
        cmd.apply(&viewport);

        let zooms: Vec<u8> = viewport.set_views().iter().map(|(_, z, _)| *z).collect();
        assert_eq!(zooms, vec![13, 15, 15]);
    }

    #[test]
    fn test_take_calls_drains() {
        let viewport = RecordingViewport::new(13);
        viewport.invalidate_size();
        assert_eq!(viewport.invalidate_count(), 1);
        assert_eq!(viewport.take_calls().len(), 1);
        assert!(viewport.calls().is_empty());
    }
}
