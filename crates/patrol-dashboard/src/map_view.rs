//! Mounted map view.
//!
//! Runs [`MapCore`] on tokio: the 100 ms drone task and the 3 s playback task
//! are [`TimerHandle`]s owned here, started and cancelled as the core's
//! effects request. Timer effects are applied while the timers lock taken
//! around the core mutation is still held. Recenters are applied under the
//! view lock, which spans the whole operation, so viewport calls land in the
//! order the core decided them. Observer calls run after all locks are
//! released.
//!
//! A [`Viewport`] implementation must not call back into its `MapView`.

use patrol_core::{
    DroneState, Effect, FollowMode, GeoPoint, MapCore, MapViewConfig, OverlaySnapshot,
    PlaybackCursor, PlaybackEpoch, PlayerState, Viewport,
};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::click::{ClickSource, ClickSubscription};
use crate::clock::Clock;
use crate::observer::{ObserverCell, RouteObserver};
use crate::resizer::MapResizer;
use crate::timer::{spawn_periodic, TimerHandle};

#[derive(Default)]
struct Timers {
    entity: Option<TimerHandle>,
    playback: Option<TimerHandle>,
}

/// Lock order: `view`, then `timers`, then `core`.
struct Shared {
    view: Mutex<()>,
    core: Mutex<MapCore>,
    timers: Mutex<Timers>,
    viewport: Arc<dyn Viewport>,
    clock: Arc<dyn Clock>,
    observer: ObserverCell,
    entity_period: Duration,
    playback_period: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn dispatch(self: &Arc<Self>, op: impl FnOnce(&mut MapCore) -> Vec<Effect>) {
        let notifications: Vec<GeoPoint> = {
            // Held through the recenters below
            let _view = lock(&self.view);

            let deferred = {
                let mut timers = lock(&self.timers);
                let effects = {
                    let mut core = lock(&self.core);
                    op(&mut *core)
                };

                let (timer_effects, deferred): (Vec<_>, Vec<_>) =
                    effects.into_iter().partition(Effect::is_timer);
                for effect in timer_effects {
                    self.apply_timer(&mut timers, effect);
                }
                deferred
            };

            let mut notifications = Vec::new();
            for effect in deferred {
                match effect {
                    Effect::Recenter(cmd) => cmd.apply(self.viewport.as_ref()),
                    Effect::Notify(point) => notifications.push(point),
                    _ => {}
                }
            }
            notifications
        };

        for point in notifications {
            self.observer.notify(point);
        }
    }

    fn apply_timer(self: &Arc<Self>, timers: &mut Timers, effect: Effect) {
        match effect {
            Effect::StartEntityTimer => {
                timers.entity = None;
                timers.entity = Some(self.spawn_entity_timer());
                tracing::info!("Drone simulation running");
            }
            Effect::StopEntityTimer => {
                if timers.entity.take().is_some() {
                    tracing::info!("Drone simulation paused");
                }
            }
            Effect::StartPlaybackTimer { epoch } => {
                timers.playback = None;
                timers.playback = Some(self.spawn_playback_timer(epoch));
                tracing::info!("Route playback armed (epoch {})", epoch);
            }
            Effect::StopPlaybackTimer => {
                if timers.playback.take().is_some() {
                    tracing::info!("Route playback stopped");
                }
            }
            Effect::Recenter(_) | Effect::Notify(_) => {}
        }
    }

    fn spawn_entity_timer(self: &Arc<Self>) -> TimerHandle {
        let weak = Arc::downgrade(self);
        spawn_periodic("entity", self.entity_period, move || {
            let Some(shared) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            let now = shared.clock.now();
            tracing::trace!("Entity tick at {}", now.timestamp_millis());
            shared.dispatch(|core| core.entity_tick(now));
            ControlFlow::Continue(())
        })
    }

    fn spawn_playback_timer(self: &Arc<Self>, epoch: PlaybackEpoch) -> TimerHandle {
        let weak: Weak<Self> = Arc::downgrade(self);
        spawn_periodic("playback", self.playback_period, move || {
            let Some(shared) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            shared.dispatch(|core| {
                let effects = core.playback_tick(epoch);
                if let Some(Effect::Notify(point)) = effects.first() {
                    tracing::debug!("Playback step {} -> {}", core.cursor().index, point);
                }
                effects
            });
            ControlFlow::Continue(())
        })
    }
}

/// A map view mounted on a viewport. Dropping it unmounts.
///
/// Must be created inside a tokio runtime.
pub struct MapView {
    shared: Arc<Shared>,
    resizer: MapResizer,
    _clicks: ClickSubscription,
}

impl MapView {
    pub fn mount(
        config: &MapViewConfig,
        viewport: Arc<dyn Viewport>,
        clicks: &ClickSource,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let shared = Arc::new(Shared {
            view: Mutex::new(()),
            core: Mutex::new(MapCore::new(config.clone())),
            timers: Mutex::new(Timers::default()),
            viewport: Arc::clone(&viewport),
            clock,
            observer: ObserverCell::new(),
            entity_period: config.entity_tick,
            playback_period: config.playback_tick,
        });

        let weak = Arc::downgrade(&shared);
        let subscription = clicks.subscribe(Arc::new(move |point: GeoPoint| {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch(|core| core.map_click(point));
            }
        }));

        let resizer = MapResizer::mount(viewport, config.resize_settle);
        shared.dispatch(MapCore::mount);
        tracing::info!("Map view mounted");

        Self {
            shared,
            resizer,
            _clicks: subscription,
        }
    }

    /// Register the callback that receives every playback step.
    pub fn set_observer(&self, observer: RouteObserver) {
        self.shared.observer.set(observer);
    }

    pub fn toggle_drawing(&self) -> bool {
        let drawing = lock(&self.shared.core).toggle_drawing();
        tracing::info!("Drawing mode {}", if drawing { "on" } else { "off" });
        drawing
    }

    pub fn set_drawing(&self, drawing: bool) {
        lock(&self.shared.core).set_drawing(drawing);
    }

    /// Same as a map click delivered through the click source.
    pub fn click(&self, point: GeoPoint) {
        self.shared.dispatch(|core| core.map_click(point));
    }

    pub fn clear_route(&self) {
        self.shared.dispatch(MapCore::clear_route);
    }

    pub fn set_drone_active(&self, active: bool) {
        self.shared.dispatch(|core| core.set_drone_active(active));
    }

    pub fn toggle_drone_active(&self) {
        self.shared.dispatch(MapCore::toggle_drone_active);
    }

    pub fn focus_on_drone(&self) {
        self.shared.dispatch(|core| core.focus_on_drone());
    }

    pub fn set_follow_drone(&self, follow: bool) {
        self.shared.dispatch(|core| core.set_follow_entity(follow));
        tracing::info!("Follow mode {:?}", self.follow_mode());
    }

    pub fn toggle_follow_drone(&self) {
        self.shared.dispatch(MapCore::toggle_follow_entity);
        tracing::info!("Follow mode {:?}", self.follow_mode());
    }

    /// The viewport container changed size.
    pub fn on_container_resize(&self) {
        self.resizer.on_resize();
    }

    pub fn overlay(&self) -> OverlaySnapshot {
        lock(&self.shared.core).overlay()
    }

    pub fn route(&self) -> Vec<GeoPoint> {
        lock(&self.shared.core).route().waypoints().to_vec()
    }

    pub fn drone(&self) -> DroneState {
        lock(&self.shared.core).drone()
    }

    pub fn cursor(&self) -> PlaybackCursor {
        lock(&self.shared.core).cursor()
    }

    pub fn player_state(&self) -> PlayerState {
        lock(&self.shared.core).player_state()
    }

    pub fn follow_mode(&self) -> FollowMode {
        lock(&self.shared.core).follow_mode()
    }

    pub fn is_drawing(&self) -> bool {
        lock(&self.shared.core).is_drawing()
    }

    pub fn entity_timer_running(&self) -> bool {
        lock(&self.shared.timers)
            .entity
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    pub fn playback_timer_running(&self) -> bool {
        lock(&self.shared.timers)
            .playback
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    pub fn is_mounted(&self) -> bool {
        lock(&self.shared.core).is_mounted()
    }

    /// Cancel both tasks, release the observer and stop reacting to input.
    /// Idempotent; also run on drop.
    pub fn unmount(&self) {
        if !self.is_mounted() {
            return;
        }
        self.shared.dispatch(MapCore::unmount);
        self.shared.observer.clear();
        tracing::info!("Map view unmounted");
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        self.unmount();
    }
}
