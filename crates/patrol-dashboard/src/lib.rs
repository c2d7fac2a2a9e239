//! Patrol dashboard shell.
//!
//! Drives the synchronous `patrol-core` map state machine on tokio timers:
//! - a 100 ms drone simulation task
//! - a 3 s route playback task
//! - map click subscription, resize handling and the playback observer

pub mod click;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod map_view;
pub mod observer;
pub mod resizer;
pub mod timer;
pub mod viewport;

pub use click::{ClickHandler, ClickSource, ClickSubscription};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use dashboard::Dashboard;
pub use history::RouteHistory;
pub use map_view::MapView;
pub use observer::{ObserverCell, RouteObserver};
pub use timer::{spawn_delayed, spawn_periodic, TimerHandle};
pub use viewport::LoggingViewport;
