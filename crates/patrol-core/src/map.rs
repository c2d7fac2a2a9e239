//! The composed map core.
//!
//! Every operation mutates state synchronously and returns the [`Effect`]s the
//! shell must carry out: start or cancel a periodic task, recenter the
//! viewport, notify the playback observer. Timer effects always come before
//! the recenter/notify effects of the same operation.

use chrono::{DateTime, Utc};

use crate::config::MapViewConfig;
use crate::follow::FollowController;
use crate::models::{DroneState, FollowMode, GeoPoint, PlaybackCursor, Route};
use crate::overlay::{OverlaySnapshot, StatusBar};
use crate::player::{PlaybackEpoch, PlayerState, RoutePlayer};
use crate::recorder::RouteRecorder;
use crate::simulator::PositionSimulator;
use crate::viewport::ViewCommand;

/// Work requested by the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// (Re)start the entity task; cancel any running one first.
    StartEntityTimer,
    StopEntityTimer,
    /// (Re)start the playback task for `epoch`; cancel any running one first.
    StartPlaybackTimer { epoch: PlaybackEpoch },
    StopPlaybackTimer,
    Recenter(ViewCommand),
    /// Report a playback step to the registered observer.
    Notify(GeoPoint),
}

impl Effect {
    pub fn is_timer(&self) -> bool {
        matches!(
            self,
            Self::StartEntityTimer
                | Self::StopEntityTimer
                | Self::StartPlaybackTimer { .. }
                | Self::StopPlaybackTimer
        )
    }
}

pub struct MapCore {
    config: MapViewConfig,
    simulator: PositionSimulator,
    recorder: RouteRecorder,
    player: RoutePlayer,
    follow: FollowController,
    mounted: bool,
}

impl MapCore {
    pub fn new(config: MapViewConfig) -> Self {
        Self {
            simulator: PositionSimulator::from_config(&config),
            recorder: RouteRecorder::new(),
            player: RoutePlayer::new(config.initial_center),
            follow: FollowController::new(config.recenter_duration_secs, config.focus_zoom),
            mounted: false,
            config,
        }
    }

    /// Start the tasks whose enabling condition already holds, then bring the
    /// viewport onto the cursor.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        self.follow.attach();

        let mut effects = Vec::new();
        if self.simulator.is_active() {
            effects.push(Effect::StartEntityTimer);
        }
        if self.player.state() == PlayerState::Following {
            effects.push(Effect::StartPlaybackTimer {
                epoch: self.player.epoch(),
            });
        }
        effects.extend(
            self.follow
                .on_cursor_moved(self.player.cursor().position)
                .map(Effect::Recenter),
        );
        effects
    }

    /// Tear down: cancel both tasks and stop driving the viewport.
    pub fn unmount(&mut self) -> Vec<Effect> {
        if !self.mounted {
            return Vec::new();
        }
        self.mounted = false;
        self.follow.detach();
        vec![Effect::StopEntityTimer, Effect::StopPlaybackTimer]
    }

    pub fn toggle_drawing(&mut self) -> bool {
        self.recorder.toggle_drawing()
    }

    pub fn set_drawing(&mut self, drawing: bool) {
        self.recorder.set_drawing(drawing);
    }

    /// Map click. Records a waypoint when drawing and arms playback on the
    /// crossing to two waypoints.
    pub fn map_click(&mut self, point: GeoPoint) -> Vec<Effect> {
        if !self.mounted || !self.recorder.on_map_click(point) {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if let Some(armed) = self.player.on_route_changed(self.recorder.route()) {
            effects.push(Effect::StartPlaybackTimer { epoch: armed.epoch });
            effects.extend(self.follow.on_cursor_moved(armed.start).map(Effect::Recenter));
        }
        effects
    }

    /// Empty the route and return the player to `Idle`.
    pub fn clear_route(&mut self) -> Vec<Effect> {
        self.recorder.clear();
        if self.player.reset() {
            vec![Effect::StopPlaybackTimer]
        } else {
            Vec::new()
        }
    }

    /// One playback period elapsed for session `epoch`.
    pub fn playback_tick(&mut self, epoch: PlaybackEpoch) -> Vec<Effect> {
        let Some(position) = self.player.advance(self.recorder.route(), epoch) else {
            return Vec::new();
        };
        let mut effects = vec![Effect::Notify(position)];
        effects.extend(self.follow.on_cursor_moved(position).map(Effect::Recenter));
        effects
    }

    /// One entity period elapsed; `now` is the wall clock.
    pub fn entity_tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let Some(position) = self.simulator.tick(now) else {
            return Vec::new();
        };
        self.follow
            .on_entity_tick(position)
            .map(Effect::Recenter)
            .into_iter()
            .collect()
    }

    pub fn set_drone_active(&mut self, active: bool) -> Vec<Effect> {
        if self.simulator.is_active() == active {
            return Vec::new();
        }
        self.simulator.set_active(active);
        if !self.mounted {
            return Vec::new();
        }
        if active {
            vec![Effect::StartEntityTimer]
        } else {
            vec![Effect::StopEntityTimer]
        }
    }

    pub fn toggle_drone_active(&mut self) -> Vec<Effect> {
        self.set_drone_active(!self.simulator.is_active())
    }

    /// Flip the "follow drone" toggle. Turning it off hands the viewport
    /// straight back to the cursor.
    pub fn set_follow_entity(&mut self, follow: bool) -> Vec<Effect> {
        if !self.follow.set_follow_entity(follow) || follow {
            return Vec::new();
        }
        self.follow
            .on_cursor_moved(self.player.cursor().position)
            .map(Effect::Recenter)
            .into_iter()
            .collect()
    }

    pub fn toggle_follow_entity(&mut self) -> Vec<Effect> {
        self.set_follow_entity(!self.follow.follows_entity())
    }

    pub fn focus_on_drone(&self) -> Vec<Effect> {
        self.follow
            .focus(self.simulator.position())
            .map(Effect::Recenter)
            .into_iter()
            .collect()
    }

    pub fn overlay(&self) -> OverlaySnapshot {
        let status = StatusBar::new(
            self.recorder.is_drawing(),
            self.player.state(),
            self.recorder.route(),
            self.simulator.is_active(),
        );
        OverlaySnapshot::build(
            self.simulator.state(),
            self.config.accuracy_radius_m,
            self.player.cursor(),
            self.recorder.route(),
            status,
        )
    }

    pub fn route(&self) -> &Route {
        self.recorder.route()
    }

    pub fn drone(&self) -> DroneState {
        self.simulator.state()
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.player.cursor()
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state()
    }

    pub fn follow_mode(&self) -> FollowMode {
        self.follow.mode()
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{ViewOptions, ZoomLevel};
    use chrono::TimeZone;

    fn cursor_recenter(center: GeoPoint) -> Effect {
        Effect::Recenter(ViewCommand {
            center,
            zoom: ZoomLevel::Current,
            opts: ViewOptions::animated(1.0),
        })
    }

    fn mounted() -> MapCore {
        let mut core = MapCore::new(MapViewConfig::default());
        assert_eq!(
            core.mount(),
            vec![
                Effect::StartEntityTimer,
                cursor_recenter(GeoPoint::new(28.6139, 77.209)),
            ]
        );
        core
    }

    fn epoch_of(effects: &[Effect]) -> PlaybackEpoch {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::StartPlaybackTimer { epoch } => Some(*epoch),
                _ => None,
            })
            .expect("playback armed")
    }

    #[test]
    fn test_two_clicks_arm_playback_with_animated_recenter() {
        let mut core = mounted();
        core.set_drawing(true);

        assert!(core.map_click(GeoPoint::new(1.0, 1.0)).is_empty());
        let effects = core.map_click(GeoPoint::new(2.0, 2.0));

        assert!(effects[0].is_timer());
        assert_eq!(
            effects[1],
            Effect::Recenter(ViewCommand {
                center: GeoPoint::new(1.0, 1.0),
                zoom: ZoomLevel::Current,
                opts: ViewOptions::animated(1.0),
            })
        );
        assert_eq!(core.player_state(), PlayerState::Following);
        assert_eq!(core.cursor().position, GeoPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_clicks_ignored_when_not_drawing() {
        let mut core = mounted();
        assert!(core.map_click(GeoPoint::new(1.0, 1.0)).is_empty());
        assert!(core.route().is_empty());
    }

    #[test]
    fn test_playback_tick_notifies_then_recenters() {
        let mut core = mounted();
        core.set_drawing(true);
        core.map_click(GeoPoint::new(1.0, 1.0));
        let epoch = epoch_of(&core.map_click(GeoPoint::new(2.0, 2.0)));

        let effects = core.playback_tick(epoch);
        assert_eq!(effects[0], Effect::Notify(GeoPoint::new(2.0, 2.0)));
        assert!(matches!(effects[1], Effect::Recenter(_)));

        let effects = core.playback_tick(epoch);
        assert_eq!(effects[0], Effect::Notify(GeoPoint::new(1.0, 1.0)));
    }

    #[test]
    fn test_clear_stops_playback_once() {
        let mut core = mounted();
        assert!(core.clear_route().is_empty());

        core.set_drawing(true);
        for p in [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)] {
            core.map_click(p.into());
        }
        assert_eq!(core.clear_route(), vec![Effect::StopPlaybackTimer]);
        assert!(core.route().is_empty());
        assert_eq!(core.cursor().index, 0);
        assert!(core.clear_route().is_empty());
    }

    #[test]
    fn test_follow_entity_routes_recenters() {
        let mut core = mounted();
        let now = Utc.timestamp_millis_opt(0).unwrap();

        assert!(core.entity_tick(now).is_empty());
        assert!(core.set_follow_entity(true).is_empty());

        let effects = core.entity_tick(now);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Recenter(ViewCommand { opts: ViewOptions { animate: false, .. }, .. })]
        ));

        let effects = core.set_follow_entity(false);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Recenter(ViewCommand { opts: ViewOptions { animate: true, .. }, .. })]
        ));
        assert!(core.entity_tick(now).is_empty());
    }

    #[test]
    fn test_pause_and_resume_drone() {
        let mut core = mounted();
        assert_eq!(core.toggle_drone_active(), vec![Effect::StopEntityTimer]);
        assert!(core.set_drone_active(false).is_empty());
        assert!(core.entity_tick(Utc::now()).is_empty());
        assert_eq!(core.toggle_drone_active(), vec![Effect::StartEntityTimer]);
    }

    #[test]
    fn test_focus_targets_drone_at_zoom_15() {
        let core = mounted();
        let effects = core.focus_on_drone();
        assert_eq!(
            effects,
            vec![Effect::Recenter(ViewCommand {
                center: GeoPoint::new(28.6139, 77.219),
                zoom: ZoomLevel::Fixed(15),
                opts: ViewOptions::animated(1.0),
            })]
        );
        assert_eq!(core.follow_mode(), FollowMode::FollowCursor);
    }

    #[test]
    fn test_unmount_cancels_everything() {
        let mut core = mounted();
        core.set_drawing(true);
        core.map_click(GeoPoint::new(1.0, 1.0));
        core.map_click(GeoPoint::new(2.0, 2.0));

        let effects = core.unmount();
        assert_eq!(
            effects,
            vec![Effect::StopEntityTimer, Effect::StopPlaybackTimer]
        );
        assert_eq!(core.follow_mode(), FollowMode::None);
        assert!(core.unmount().is_empty());
        assert!(core.map_click(GeoPoint::new(3.0, 3.0)).is_empty());
    }

    #[test]
    fn test_remount_resumes_running_playback() {
        let mut core = mounted();
        core.set_drawing(true);
        core.map_click(GeoPoint::new(1.0, 1.0));
        let epoch = epoch_of(&core.map_click(GeoPoint::new(2.0, 2.0)));
        core.unmount();

        assert_eq!(
            core.mount(),
            vec![
                Effect::StartEntityTimer,
                Effect::StartPlaybackTimer { epoch },
                cursor_recenter(GeoPoint::new(1.0, 1.0)),
            ]
        );
        assert_eq!(core.follow_mode(), FollowMode::FollowCursor);
    }

    #[test]
    fn test_mount_while_following_drone_skips_cursor_recenter() {
        let mut core = mounted();
        core.set_follow_entity(true);
        core.unmount();

        let effects = core.mount();
        assert_eq!(effects, vec![Effect::StartEntityTimer]);
        assert!(effects.iter().all(Effect::is_timer));
        assert_eq!(core.follow_mode(), FollowMode::FollowEntity);
    }
}
