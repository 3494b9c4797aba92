use crate::grid::{MAX_YEAR, MIN_YEAR};
use crate::offline::{CacheGeneration, DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_VERSION};
use chrono::{Datelike, Local};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_DATA_PATH: &str = "data/state.json";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub year: i32,
    pub cache: CacheGeneration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_path = lookup("APP_DATA_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT);
        let current_year = Local::now().year();
        let mut year = parse_or("TRACKER_YEAR", lookup("TRACKER_YEAR"), current_year);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            warn!("ignoring TRACKER_YEAR={year} outside {MIN_YEAR}..={MAX_YEAR}");
            year = current_year;
        }
        let version = parse_or("CACHE_VERSION", lookup("CACHE_VERSION"), DEFAULT_CACHE_VERSION);

        Self {
            data_path,
            port,
            year,
            cache: CacheGeneration::new(DEFAULT_CACHE_PREFIX, version),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("ignoring invalid {key}={raw:?}");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.year, Local::now().year());
        assert_eq!(config.cache.name(), "activity-tracker-v2");
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = config_from(&[
            ("APP_DATA_PATH", "/tmp/tracker.json"),
            ("PORT", "9000"),
            ("TRACKER_YEAR", "2024"),
            ("CACHE_VERSION", "5"),
        ]);
        assert_eq!(config.data_path, PathBuf::from("/tmp/tracker.json"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.year, 2024);
        assert_eq!(config.cache.name(), "activity-tracker-v5");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[("PORT", "http"), ("TRACKER_YEAR", "soon")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.year, Local::now().year());
    }

    #[test]
    fn out_of_range_year_falls_back() {
        for raw in ["0", "-40", "10000"] {
            let config = config_from(&[("TRACKER_YEAR", raw)]);
            assert_eq!(config.year, Local::now().year(), "{raw}");
        }
        assert_eq!(config_from(&[("TRACKER_YEAR", "9999")]).year, 9999);
    }
}
