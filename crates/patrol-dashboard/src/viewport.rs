//! Headless viewport that logs instead of rendering.

use patrol_core::{GeoPoint, ViewOptions, Viewport};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

#[derive(Debug)]
pub struct LoggingViewport {
    zoom: AtomicU8,
    set_views: AtomicUsize,
}

impl LoggingViewport {
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom: AtomicU8::new(zoom),
            set_views: AtomicUsize::new(0),
        }
    }

    pub fn set_view_count(&self) -> usize {
        self.set_views.load(Ordering::Relaxed)
    }
}

impl Viewport for LoggingViewport {
    fn set_view(&self, center: GeoPoint, zoom: u8, opts: ViewOptions) {
        self.zoom.store(zoom, Ordering::Relaxed);
        self.set_views.fetch_add(1, Ordering::Relaxed);
        if opts.animate {
            tracing::debug!(
                "setView {} zoom {} (animated {:.1}s)",
                center,
                zoom,
                opts.duration_secs
            );
        } else {
            tracing::trace!("setView {} zoom {}", center, zoom);
        }
    }

    fn zoom(&self) -> u8 {
        self.zoom.load(Ordering::Relaxed)
    }

    fn invalidate_size(&self) {
        tracing::debug!("invalidateSize");
    }
}
