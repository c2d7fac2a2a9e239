//! Simulated drone motion.
//!
//! The drone flies a Lissajous orbit around a base point. Its position is a
//! pure function of wall-clock time, so any two simulators fed the same
//! timestamps agree exactly.

use chrono::{DateTime, Utc};

use crate::config::MapViewConfig;
use crate::models::{DroneState, GeoPoint};

/// Trait for simulated flight paths.
pub trait FlightPath: Send + Sync {
    /// Position at `now_ms` milliseconds since the Unix epoch.
    fn position_at(&self, now_ms: i64) -> GeoPoint;

    /// Approximate heading at `now_ms` (degrees, 0 = North).
    fn heading_at(&self, now_ms: i64) -> f64 {
        // Estimate from the position delta over a short step
        let dt_ms = 100;
        let a = self.position_at(now_ms);
        let b = self.position_at(now_ms + dt_ms);

        let dlat = b.lat - a.lat;
        let dlng = b.lng - a.lng;

        if dlat.abs() < 1e-12 && dlng.abs() < 1e-12 {
            return 0.0;
        }

        let heading_deg = dlng.atan2(dlat).to_degrees();
        if heading_deg < 0.0 {
            heading_deg + 360.0
        } else {
            heading_deg
        }
    }
}

/// Orbit with independent latitude and longitude frequencies.
///
/// `lat = base.lat + sin(t) * r`, `lng = base.lng + cos(f * t) * r`,
/// with `t = now_ms / divisor`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPath {
    pub base: GeoPoint,
    pub radius_deg: f64,
    pub time_divisor_ms: f64,
    pub lng_frequency: f64,
}

impl OrbitPath {
    pub fn from_config(config: &MapViewConfig) -> Self {
        Self {
            base: config.orbit_base,
            radius_deg: config.orbit_radius_deg,
            time_divisor_ms: config.orbit_time_divisor_ms,
            lng_frequency: config.orbit_lng_frequency,
        }
    }
}

impl Default for OrbitPath {
    fn default() -> Self {
        Self::from_config(&MapViewConfig::default())
    }
}

impl FlightPath for OrbitPath {
    fn position_at(&self, now_ms: i64) -> GeoPoint {
        let t = now_ms as f64 / self.time_divisor_ms;
        GeoPoint::new(
            self.base.lat + t.sin() * self.radius_deg,
            self.base.lng + (t * self.lng_frequency).cos() * self.radius_deg,
        )
    }
}

/// Drives a [`FlightPath`] from clock readings.
///
/// Pausing only stops position updates; the last position is kept.
pub struct PositionSimulator<P: FlightPath = OrbitPath> {
    path: P,
    state: DroneState,
}

impl PositionSimulator<OrbitPath> {
    pub fn from_config(config: &MapViewConfig) -> Self {
        Self::new(OrbitPath::from_config(config), config.initial_drone_position)
    }
}

impl<P: FlightPath> PositionSimulator<P> {
    /// Create an active simulator showing `initial` until the first tick.
    pub fn new(path: P, initial: GeoPoint) -> Self {
        Self {
            path,
            state: DroneState {
                position: initial,
                heading_deg: 0.0,
                active: true,
            },
        }
    }

    /// Advance to `now`. Returns the new position, or `None` while paused.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<GeoPoint> {
        if !self.state.active {
            return None;
        }
        let now_ms = now.timestamp_millis();
        self.state.position = self.path.position_at(now_ms);
        self.state.heading_deg = self.path.heading_at(now_ms);
        Some(self.state.position)
    }

    pub fn set_active(&mut self, active: bool) {
        self.state.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn state(&self) -> DroneState {
        self.state
    }

    pub fn position(&self) -> GeoPoint {
        self.state.position
    }
}
