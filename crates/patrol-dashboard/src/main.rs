//! Headless patrol dashboard.
//!
//! Mounts the map view on a logging viewport, draws the given waypoints, lets
//! the drone and the route playback run for a while, then prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use patrol_core::GeoPoint;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patrol_dashboard::{Config, Dashboard, LoggingViewport, SystemClock};

/// Run the patrol map without a renderer
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Waypoint as LAT,LNG (repeatable)
    #[arg(long = "waypoint", value_parser = parse_waypoint)]
    waypoints: Vec<GeoPoint>,

    /// How long to run, in seconds
    #[arg(long, default_value_t = 10)]
    duration: u64,

    /// Track the drone instead of the playback cursor
    #[arg(long)]
    follow_drone: bool,

    /// Start with the drone paused
    #[arg(long)]
    pause_drone: bool,

    /// Print the final overlay snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,
}

fn parse_waypoint(raw: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {raw:?}"))?;
    let point = GeoPoint::new(
        lat.trim().parse().map_err(|e| format!("bad latitude {lat:?}: {e}"))?,
        lng.trim().parse().map_err(|e| format!("bad longitude {lng:?}: {e}"))?,
    );
    if !point.is_valid() {
        return Err(format!("{raw:?} is not a valid coordinate"));
    }
    Ok(point)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with((!args.log_json).then(tracing_subscriber::fmt::layer))
        .with(args.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("patrol_dashboard=debug".parse()?))
        .init();
    let config = Config::from_env().context("invalid PATROL_* configuration")?;

    tracing::info!("Starting patrol dashboard...");
    let viewport = Arc::new(LoggingViewport::new(config.map.initial_zoom));
    let dashboard = Dashboard::new(config.map.clone(), viewport.clone(), Arc::new(SystemClock));
    let map = dashboard.map();

    if args.pause_drone {
        map.set_drone_active(false);
    }
    if args.follow_drone {
        map.set_follow_drone(true);
    }

    if !args.waypoints.is_empty() {
        map.set_drawing(true);
        for point in &args.waypoints {
            dashboard.clicks().emit(*point);
        }
        map.set_drawing(false);
    }

    tokio::time::sleep(Duration::from_secs(args.duration)).await;

    let overlay = map.overlay();
    if args.json {
        println!("{}", overlay.to_json()?);
    } else {
        println!("Status: {}", overlay.status.label);
        println!("  Waypoints: {}", overlay.status.waypoint_count);
        println!("  {}", overlay.status.drone_label());
        println!("  Drone at {}", overlay.drone.position);
        println!("  Cursor at {}", overlay.cursor.position);
        println!("  Playback steps reported: {}", dashboard.history().len());
        println!("  Viewport recenters: {}", viewport.set_view_count());
    }

    map.unmount();
    Ok(())
}
