//! Data models for sensors, their maintenance history and the people
//! responsible for it.
//!
//! These types double as the on-disk document schema: a sensor collection is
//! a JSON object keyed by sensor id, a people collection is a JSON array of
//! names.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---

/// Sensor collection keyed by sensor id.
pub type SensorMap = BTreeMap<String, Sensor>;

/// Person collection in insertion (display) order.
pub type People = Vec<String>;

/// Geographic position, persisted as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    // ---
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

/// One logged service event plus its next scheduled due date.
///
/// Records are never edited after creation, only removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintenance {
    // ---
    /// Day the maintenance was performed.
    pub date: NaiveDate,
    pub description: String,
    /// Day the next maintenance is due.
    pub next_due: NaiveDate,
    /// Name of the responsible person, kept as plain text.
    pub responsible: String,
}

/// A tracked sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    // ---
    pub name: String,
    pub coordinates: Coordinates,
    /// Maintenance records in entry order.
    #[serde(default)]
    pub maintenances: Vec<Maintenance>,
}

impl Sensor {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            coordinates,
            maintenances: Vec::new(),
        }
    }
}

/// Input for a new maintenance record, as submitted by the maintenance form.
///
/// The performed date is not part of the input; it is stamped with the
/// current day when the record is created.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMaintenance {
    // ---
    pub description: String,
    pub next_due: NaiveDate,
    /// `None` when no responsible person was selected.
    #[serde(default)]
    pub responsible: Option<String>,
}
