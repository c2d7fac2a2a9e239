//! Core data models for the patrol map.

use serde::{Deserialize, Serialize};

/// A planar latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Operator-drawn patrol path.
///
/// Waypoints are only ever appended; the sole removal is [`Route::clear`],
/// which empties the whole route at once. A waypoint is identified by its
/// position in the sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    waypoints: Vec<GeoPoint>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: GeoPoint) {
        self.waypoints.push(point);
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<GeoPoint> {
        self.waypoints.get(index).copied()
    }

    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeoPoint> {
        self.waypoints.iter()
    }
}

/// Simulated drone. `position` is derived from the clock on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DroneState {
    pub position: GeoPoint,
    /// Direction of travel in degrees, 0 = North.
    pub heading_deg: f64,
    pub active: bool,
}

/// Replay cursor stepping through a [`Route`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackCursor {
    pub position: GeoPoint,
    pub index: usize,
    pub running: bool,
}

/// Which moving point currently owns the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowMode {
    /// Nothing recenters the viewport (view detached).
    None,
    /// The simulated drone is tracked on every entity tick.
    FollowEntity,
    /// The playback cursor is tracked on every position change.
    #[default]
    FollowCursor,
}
