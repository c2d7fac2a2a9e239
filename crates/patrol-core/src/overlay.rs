//! Declarative overlay inputs handed to the renderer.
//!
//! The core never draws. It describes what should be on the map and in the
//! status bar; the rendering library owns markers, lines and icons.

use serde::Serialize;

use crate::models::{DroneState, GeoPoint, PlaybackCursor, Route};
use crate::player::PlayerState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroneMarker {
    pub position: GeoPoint,
    pub heading_deg: f64,
    pub accuracy_radius_m: f64,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointMarker {
    pub index: usize,
    pub label: String,
    pub position: GeoPoint,
    pub popup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    Drawing,
    FollowingRoute,
    Idle,
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Drawing => "Drawing Mode - Click to add waypoints",
            Self::FollowingRoute => "Following Route",
            Self::Idle => "Idle",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBar {
    pub label: StatusLabel,
    pub waypoint_count: usize,
    pub drone_active: bool,
    /// "Clear route" is only offered when there is something to clear.
    pub clear_enabled: bool,
}

impl StatusBar {
    pub fn new(drawing: bool, player: PlayerState, route: &Route, drone_active: bool) -> Self {
        let label = if drawing {
            StatusLabel::Drawing
        } else if player == PlayerState::Following {
            StatusLabel::FollowingRoute
        } else {
            StatusLabel::Idle
        };
        Self {
            label,
            waypoint_count: route.len(),
            drone_active,
            clear_enabled: !route.is_empty(),
        }
    }

    pub fn drone_label(&self) -> &'static str {
        if self.drone_active {
            "Drone Active"
        } else {
            "Drone Paused"
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    pub drone: DroneMarker,
    pub cursor: PlaybackCursor,
    pub waypoints: Vec<WaypointMarker>,
    /// Connecting line, present only for two or more waypoints.
    pub route_line: Option<Vec<GeoPoint>>,
    pub status: StatusBar,
}

impl OverlaySnapshot {
    pub fn build(
        drone: DroneState,
        accuracy_radius_m: f64,
        cursor: PlaybackCursor,
        route: &Route,
        status: StatusBar,
    ) -> Self {
        let waypoints = route
            .iter()
            .enumerate()
            .map(|(index, &position)| WaypointMarker {
                index,
                label: format!("Waypoint {}", index + 1),
                position,
                popup: coordinates_popup(position),
            })
            .collect();

        let route_line = (route.len() > 1).then(|| route.waypoints().to_vec());

        Self {
            drone: DroneMarker {
                position: drone.position,
                heading_deg: drone.heading_deg,
                accuracy_radius_m,
                popup: coordinates_popup(drone.position),
            },
            cursor,
            waypoints,
            route_line,
            status,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn coordinates_popup(point: GeoPoint) -> String {
    format!("Lat: {:.4}\nLng: {:.4}", point.lat, point.lng)
}
