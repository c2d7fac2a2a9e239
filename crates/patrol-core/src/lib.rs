pub mod config;
pub mod error;
pub mod follow;
pub mod map;
pub mod models;
pub mod overlay;
pub mod player;
pub mod recorder;
pub mod simulator;
pub mod viewport;

pub use config::MapViewConfig;
pub use error::ConfigError;
pub use follow::FollowController;
pub use map::{Effect, MapCore};
pub use models::{DroneState, FollowMode, GeoPoint, PlaybackCursor, Route};
pub use overlay::{DroneMarker, OverlaySnapshot, StatusBar, StatusLabel, WaypointMarker};
pub use player::{Armed, PlaybackEpoch, PlayerState, RoutePlayer};
pub use recorder::RouteRecorder;
pub use simulator::{FlightPath, OrbitPath, PositionSimulator};
pub use viewport::{
    RecordingViewport, ViewCommand, ViewOptions, Viewport, ViewportCall, ZoomLevel,
};
