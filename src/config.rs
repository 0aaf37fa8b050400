//! Configuration loader for the `codemetal-sensormap` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller), so `env::var` calls stay out of the rest of the
//! codebase.
//!
use std::{env, net::SocketAddr, path::PathBuf};

use anyhow::{anyhow, Result};

use crate::models::Coordinates;
use crate::service::MapSettings;
use crate::store::JsonFileStore;

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Directory holding the data files.
    pub data_dir: PathBuf,

    /// Sensor collection file name, relative to `data_dir`.
    pub sensors_file: String,

    /// People collection file name, relative to `data_dir`.
    pub people_file: String,

    /// Address the HTTP adapter binds to.
    pub bind_addr: SocketAddr,

    /// Initial map center and zoom.
    pub map: MapSettings,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `SENSORMAP_DATA_DIR` – data directory (default: `.`)
/// - `SENSORS_FILE` – sensor file name (default: `sensors.json`)
/// - `PEOPLE_FILE` – people file name (default: `people.json`)
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
/// - `MAP_CENTER_LAT` / `MAP_CENTER_LNG` – map center (default: Tefé)
/// - `MAP_ZOOM` – initial zoom level (default: 12)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = MapSettings::default();

    let data_dir = PathBuf::from(env_or!("SENSORMAP_DATA_DIR", "."));
    let sensors_file = env_or!("SENSORS_FILE", "sensors.json");
    let people_file = env_or!("PEOPLE_FILE", "people.json");
    let bind_addr = parse_env!("BIND_ADDR", SocketAddr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    let lat = parse_env!("MAP_CENTER_LAT", f64, defaults.center.lat);
    let lng = parse_env!("MAP_CENTER_LNG", f64, defaults.center.lng);
    let zoom = parse_env!("MAP_ZOOM", u8, defaults.zoom);

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(anyhow!("Map center out of range: [{}, {}]", lat, lng));
    }

    Ok(Config {
        data_dir,
        sensors_file,
        people_file,
        bind_addr,
        map: MapSettings {
            center: Coordinates::new(lat, lng),
            zoom,
        },
    })
}

impl Config {
    /// Build the file store described by this configuration.
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(
            self.data_dir.join(&self.sensors_file),
            self.data_dir.join(&self.people_file),
        )
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  SENSORMAP_DATA_DIR : {}", self.data_dir.display());
        tracing::info!("  SENSORS_FILE       : {}", self.sensors_file);
        tracing::info!("  PEOPLE_FILE        : {}", self.people_file);
        tracing::info!("  BIND_ADDR          : {}", self.bind_addr);
        tracing::info!(
            "  MAP_CENTER         : [{}, {}]",
            self.map.center.lat,
            self.map.center.lng
        );
        tracing::info!("  MAP_ZOOM           : {}", self.map.zoom);
    }
}
