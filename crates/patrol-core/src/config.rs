//! Tunables for the map view: simulation constants, timer periods, zoom levels.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::GeoPoint;

/// Configuration for one mounted map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewConfig {
    /// Center of the simulated drone orbit
    pub orbit_base: GeoPoint,
    /// Orbit amplitude in degrees
    pub orbit_radius_deg: f64,
    /// Milliseconds per radian of orbit phase
    pub orbit_time_divisor_ms: f64,
    /// Longitude phase multiplier relative to latitude
    pub orbit_lng_frequency: f64,
    /// Drone position shown before the first entity tick
    pub initial_drone_position: GeoPoint,
    /// Map center and cursor position before any playback
    pub initial_center: GeoPoint,
    pub initial_zoom: u8,
    /// Zoom used by the one-shot focus command
    pub focus_zoom: u8,
    /// Animation length for cursor-follow and focus recenters
    pub recenter_duration_secs: f64,
    /// Accuracy circle drawn around the drone, meters
    pub accuracy_radius_m: f64,
    #[serde(with = "millis")]
    pub entity_tick: Duration,
    #[serde(with = "millis")]
    pub playback_tick: Duration,
    /// Delay between a container resize and `invalidate_size`
    #[serde(with = "millis")]
    pub resize_settle: Duration,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            orbit_base: GeoPoint::new(28.6139, 77.209), // New Delhi
            orbit_radius_deg: 0.02,
            orbit_time_divisor_ms: 3000.0,
            orbit_lng_frequency: 1.5,
            initial_drone_position: GeoPoint::new(28.6139, 77.219),
            initial_center: GeoPoint::new(28.6139, 77.209),
            initial_zoom: 13,
            focus_zoom: 15,
            recenter_duration_secs: 1.0,
            accuracy_radius_m: 100.0,
            entity_tick: Duration::from_millis(100),
            playback_tick: Duration::from_millis(3000),
            resize_settle: Duration::from_millis(100),
        }
    }
}

impl MapViewConfig {
    /// Check that every field can drive the simulator and timers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("entity_tick", self.entity_tick),
            ("playback_tick", self.playback_tick),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(field));
            }
        }

        for (field, value) in [
            ("orbit_radius_deg", self.orbit_radius_deg),
            ("orbit_time_divisor_ms", self.orbit_time_divisor_ms),
            ("orbit_lng_frequency", self.orbit_lng_frequency),
            ("recenter_duration_secs", self.recenter_duration_secs),
            ("accuracy_radius_m", self.accuracy_radius_m),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNumber { field, value });
            }
        }
        if self.orbit_time_divisor_ms == 0.0 {
            return Err(ConfigError::InvalidNumber {
                field: "orbit_time_divisor_ms",
                value: 0.0,
            });
        }

        for (field, point) in [
            ("orbit_base", self.orbit_base),
            ("initial_drone_position", self.initial_drone_position),
            ("initial_center", self.initial_center),
        ] {
            if !point.is_valid() {
                return Err(ConfigError::InvalidCoordinate {
                    field,
                    lat: point.lat,
                    lng: point.lng,
                });
            }
        }

        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
