//! Host that owns the map view and the playback history.

use patrol_core::{MapViewConfig, Viewport};
use std::sync::Arc;

use crate::click::ClickSource;
use crate::clock::Clock;
use crate::history::RouteHistory;
use crate::map_view::MapView;

pub struct Dashboard {
    config: MapViewConfig,
    viewport: Arc<dyn Viewport>,
    clicks: ClickSource,
    clock: Arc<dyn Clock>,
    history: RouteHistory,
    map: MapView,
    mount_count: u64,
}

impl Dashboard {
    /// Mount a fresh map view wired to a new history. Needs a tokio runtime.
    pub fn new(config: MapViewConfig, viewport: Arc<dyn Viewport>, clock: Arc<dyn Clock>) -> Self {
        let clicks = ClickSource::new();
        let history = RouteHistory::new();
        let map = mount_map(&config, &viewport, &clicks, &clock, &history);

        Self {
            config,
            viewport,
            clicks,
            clock,
            history,
            map,
            mount_count: 1,
        }
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Where the map library delivers clicks.
    pub fn clicks(&self) -> &ClickSource {
        &self.clicks
    }

    pub fn history(&self) -> &RouteHistory {
        &self.history
    }

    /// How many times the map view has been mounted.
    pub fn mount_count(&self) -> u64 {
        self.mount_count
    }

    /// Wipe the history and remount the map view from scratch.
    pub fn reset_route(&mut self) {
        self.map.unmount();
        self.history.reset();
        self.map = mount_map(
            &self.config,
            &self.viewport,
            &self.clicks,
            &self.clock,
            &self.history,
        );
        self.mount_count += 1;
        tracing::info!("Route reset, map view remounted ({})", self.mount_count);
    }
}

fn mount_map(
    config: &MapViewConfig,
    viewport: &Arc<dyn Viewport>,
    clicks: &ClickSource,
    clock: &Arc<dyn Clock>,
    history: &RouteHistory,
) -> MapView {
    let map = MapView::mount(config, Arc::clone(viewport), clicks, Arc::clone(clock));
    map.set_observer(history.observer());
    map
}
