//! Waypoint capture from map clicks.

use crate::models::{GeoPoint, Route};

/// Accumulates waypoints while drawing mode is on.
#[derive(Debug, Clone, Default)]
pub struct RouteRecorder {
    route: Route,
    drawing: bool,
}

impl RouteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `point` when drawing. Returns whether the route grew.
    pub fn on_map_click(&mut self, point: GeoPoint) -> bool {
        if !self.drawing {
            return false;
        }
        self.route.push(point);
        true
    }

    /// Empty the route. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_points = !self.route.is_empty();
        self.route.clear();
        had_points
    }

    pub fn set_drawing(&mut self, drawing: bool) {
        self.drawing = drawing;
    }

    pub fn toggle_drawing(&mut self) -> bool {
        self.drawing = !self.drawing;
        self.drawing
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn route(&self) -> &Route {
        &self.route
    }
}
