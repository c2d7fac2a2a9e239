//! Dashboard configuration from environment.

use patrol_core::{ConfigError, GeoPoint, MapViewConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub map: MapViewConfig,
}

impl Config {
    /// Defaults overridden by `PATROL_*` variables, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut map = MapViewConfig::default();

        if let Some(ms) = parse_var::<u64>(&lookup, "PATROL_ENTITY_TICK_MS")? {
            map.entity_tick = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "PATROL_PLAYBACK_TICK_MS")? {
            map.playback_tick = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "PATROL_RESIZE_SETTLE_MS")? {
            map.resize_settle = Duration::from_millis(ms);
        }
        let lat = parse_var::<f64>(&lookup, "PATROL_BASE_LAT")?;
        let lng = parse_var::<f64>(&lookup, "PATROL_BASE_LNG")?;
        if lat.is_some() || lng.is_some() {
            map.orbit_base = GeoPoint::new(
                lat.unwrap_or(map.orbit_base.lat),
                lng.unwrap_or(map.orbit_base.lng),
            );
        }
        if let Some(radius) = parse_var::<f64>(&lookup, "PATROL_ORBIT_RADIUS")? {
            map.orbit_radius_deg = radius;
        }
        if let Some(zoom) = parse_var::<u8>(&lookup, "PATROL_FOCUS_ZOOM")? {
            map.focus_zoom = zoom;
        }
        if let Some(zoom) = parse_var::<u8>(&lookup, "PATROL_INITIAL_ZOOM")? {
            map.initial_zoom = zoom;
        }

        map.validate()?;
        Ok(Self { map })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::invalid_value(key, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn empty_env_gives_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.map, MapViewConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("PATROL_PLAYBACK_TICK_MS", "500"),
            ("PATROL_BASE_LAT", " 33.6846 "),
            ("PATROL_FOCUS_ZOOM", "17"),
        ]))
        .unwrap();

        assert_eq!(config.map.playback_tick, Duration::from_millis(500));
        assert_eq!(config.map.orbit_base, GeoPoint::new(33.6846, 77.209));
        assert_eq!(config.map.focus_zoom, 17);
    }

    #[test]
    fn garbage_is_an_error() {
        let err = Config::from_lookup(lookup(&[("PATROL_ENTITY_TICK_MS", "fast")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::invalid_value("PATROL_ENTITY_TICK_MS", "fast")
        );
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = Config::from_lookup(lookup(&[("PATROL_ENTITY_TICK_MS", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroDuration("entity_tick"));
    }
}
