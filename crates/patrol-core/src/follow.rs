//! Viewport ownership between the drone and the playback cursor.
//!
//! A single boolean ("follow drone") picks the owner. Recenters from the
//! other source are dropped, regardless of which timer fires first.

use crate::models::{FollowMode, GeoPoint};
use crate::viewport::{ViewCommand, ViewOptions, ZoomLevel};

#[derive(Debug, Clone)]
pub struct FollowController {
    follow_entity: bool,
    detached: bool,
    animation_secs: f64,
    focus_zoom: u8,
}

impl FollowController {
    pub fn new(animation_secs: f64, focus_zoom: u8) -> Self {
        Self {
            follow_entity: false,
            detached: false,
            animation_secs,
            focus_zoom,
        }
    }

    pub fn mode(&self) -> FollowMode {
        if self.detached {
            FollowMode::None
        } else if self.follow_entity {
            FollowMode::FollowEntity
        } else {
            FollowMode::FollowCursor
        }
    }

    pub fn follows_entity(&self) -> bool {
        self.follow_entity
    }

    /// Set the "follow drone" toggle. Returns whether the mode changed.
    pub fn set_follow_entity(&mut self, follow: bool) -> bool {
        let changed = self.follow_entity != follow;
        self.follow_entity = follow;
        changed
    }

    /// Stop issuing recenters (view torn down).
    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn attach(&mut self) {
        self.detached = false;
    }

    /// Unanimated jump to the drone, only while following it.
    pub fn on_entity_tick(&self, position: GeoPoint) -> Option<ViewCommand> {
        (self.mode() == FollowMode::FollowEntity).then_some(ViewCommand {
            center: position,
            zoom: ZoomLevel::Current,
            opts: ViewOptions::immediate(),
        })
    }

    /// Animated pan to the cursor, only while following it.
    pub fn on_cursor_moved(&self, position: GeoPoint) -> Option<ViewCommand> {
        (self.mode() == FollowMode::FollowCursor).then_some(ViewCommand {
            center: position,
            zoom: ZoomLevel::Current,
            opts: ViewOptions::animated(self.animation_secs),
        })
    }

    /// One-shot focus on the drone at the fixed focus zoom. Mode is untouched.
    pub fn focus(&self, entity: GeoPoint) -> Option<ViewCommand> {
        (self.mode() != FollowMode::None).then_some(ViewCommand {
            center: entity,
            zoom: ZoomLevel::Fixed(self.focus_zoom),
            opts: ViewOptions::animated(self.animation_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: GeoPoint = GeoPoint::new(1.0, 2.0);

    #[test]
    fn test_default_follows_cursor() {
        let follow = FollowController::new(1.0, 15);
        assert_eq!(follow.mode(), FollowMode::FollowCursor);
        assert!(follow.on_entity_tick(P).is_none());

        let cmd = follow.on_cursor_moved(P).unwrap();
        assert_eq!(cmd.zoom, ZoomLevel::Current);
        assert_eq!(cmd.opts, ViewOptions::animated(1.0));
    }

    #[test]
    fn test_follow_entity_is_exclusive() {
        let mut follow = FollowController::new(1.0, 15);
        assert!(follow.set_follow_entity(true));
        assert!(!follow.set_follow_entity(true));
        assert_eq!(follow.mode(), FollowMode::FollowEntity);

        assert!(follow.on_cursor_moved(P).is_none());
        let cmd = follow.on_entity_tick(P).unwrap();
        assert_eq!(cmd.opts, ViewOptions::immediate());

        follow.set_follow_entity(false);
        assert!(follow.on_entity_tick(P).is_none());
        assert!(follow.on_cursor_moved(P).is_some());
    }

    #[test]
    fn test_focus_uses_fixed_zoom_without_changing_mode() {
        let follow = FollowController::new(1.0, 15);
        let cmd = follow.focus(P).unwrap();
        assert_eq!(cmd.zoom, ZoomLevel::Fixed(15));
        assert!(cmd.opts.animate);
        assert_eq!(follow.mode(), FollowMode::FollowCursor);
    }

    #[test]
    fn test_detached_issues_nothing() {
        let mut follow = FollowController::new(1.0, 15);
        follow.set_follow_entity(true);
        follow.detach();
        assert_eq!(follow.mode(), FollowMode::None);
        assert!(follow.on_entity_tick(P).is_none());
        assert!(follow.on_cursor_moved(P).is_none());
        assert!(follow.focus(P).is_none());
    }
}
