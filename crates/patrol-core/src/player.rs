//! Route playback state machine.
//!
//! ```text
//!            len(route) crosses to >= 2
//!   Idle ───────────────────────────────► Following ──┐
//!    ▲                                        │  ▲    │ tick: index = (index + 1) % len
//!    └──────────────── reset() ───────────────┘  └────┘
//! ```
//!
//! The player never owns a timer. Arming returns an epoch that the caller
//! attaches to its periodic task; ticks carrying any other epoch are ignored.

use serde::Serialize;

use crate::models::{GeoPoint, PlaybackCursor, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Idle,
    Following,
}

/// Identifies one armed playback session.
pub type PlaybackEpoch = u64;

/// Result of entering `Following`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Armed {
    pub epoch: PlaybackEpoch,
    pub start: GeoPoint,
}

#[derive(Debug, Clone)]
pub struct RoutePlayer {
    cursor: PlaybackCursor,
    epoch: PlaybackEpoch,
}

impl RoutePlayer {
    /// Create an idle player parked at `initial`.
    pub fn new(initial: GeoPoint) -> Self {
        Self {
            cursor: PlaybackCursor {
                position: initial,
                index: 0,
                running: false,
            },
            epoch: 0,
        }
    }

    /// Guarded `Idle -> Following` transition, evaluated after every route
    /// mutation. Fires only on the crossing; a no-op while already following.
    pub fn on_route_changed(&mut self, route: &Route) -> Option<Armed> {
        if self.cursor.running || route.len() < 2 {
            return None;
        }
        let start = route.get(0)?;

        self.epoch += 1;
        self.cursor = PlaybackCursor {
            position: start,
            index: 0,
            running: true,
        };
        Some(Armed {
            epoch: self.epoch,
            start,
        })
    }

    /// Timer self-loop. Returns the new cursor position, or `None` when the
    /// tick belongs to a cancelled session.
    pub fn advance(&mut self, route: &Route, epoch: PlaybackEpoch) -> Option<GeoPoint> {
        if !self.cursor.running || epoch != self.epoch || route.len() < 2 {
            return None;
        }
        let next = (self.cursor.index + 1) % route.len();
        let position = route.get(next)?;

        self.cursor.index = next;
        self.cursor.position = position;
        Some(position)
    }

    /// `Following -> Idle`. Returns whether a session was running.
    ///
    /// The cursor keeps its last position.
    pub fn reset(&mut self) -> bool {
        let was_running = self.cursor.running;
        self.cursor.index = 0;
        self.cursor.running = false;
        was_running
    }

    pub fn state(&self) -> PlayerState {
        if self.cursor.running {
            PlayerState::Following
        } else {
            PlayerState::Idle
        }
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn epoch(&self) -> PlaybackEpoch {
        self.epoch
    }
}
