//! Maintenance urgency classification.
//!
//! Status is always derived from the current date and the stored due dates;
//! it is never persisted.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Sensor, SensorMap};

// ---

/// Days remaining above which a sensor is [`Status::Green`].
pub const GREEN_ABOVE_DAYS: i64 = 10;

/// Days remaining from which a sensor is at least [`Status::Yellow`].
pub const YELLOW_FROM_DAYS: i64 = 5;

/// Marker color for sensors with no maintenance records.
pub const NEUTRAL_COLOR: &str = "blue";

/// Urgency tier derived from days until the next maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Green,
    Yellow,
    Red,
}

impl Status {
    /// Map marker color for this status.
    pub fn marker_color(self) -> &'static str {
        match self {
            Status::Green => "green",
            Status::Yellow => "orange",
            Status::Red => "red",
        }
    }
}

/// Classify a due date relative to `today`.
///
/// Days remaining is plain calendar-date subtraction, so a due date of today
/// is 0 days and anything overdue is negative.
pub fn classify(next_due: NaiveDate, today: NaiveDate) -> Status {
    // ---
    let days_remaining = (next_due - today).num_days();

    if days_remaining > GREEN_ABOVE_DAYS {
        Status::Green
    } else if days_remaining >= YELLOW_FROM_DAYS {
        Status::Yellow
    } else {
        Status::Red
    }
}

/// Earliest next-due date across all of a sensor's records.
pub fn soonest_due(sensor: &Sensor) -> Option<NaiveDate> {
    sensor.maintenances.iter().map(|m| m.next_due).min()
}

/// Status of a sensor, governed by its soonest due maintenance.
///
/// Returns `None` for a sensor with no records.
pub fn sensor_status(sensor: &Sensor, today: NaiveDate) -> Option<Status> {
    soonest_due(sensor).map(|due| classify(due, today))
}

/// Marker color for a sensor, falling back to [`NEUTRAL_COLOR`].
pub fn marker_color(sensor: &Sensor, today: NaiveDate) -> &'static str {
    sensor_status(sensor, today).map_or(NEUTRAL_COLOR, Status::marker_color)
}

/// Standalone warning raised for a sensor in [`Status::Red`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    // ---
    pub sensor_id: String,
    pub sensor_name: String,
    pub next_due: NaiveDate,
    pub message: String,
}

/// Collect an alert for every sensor whose soonest due date is red.
pub fn alerts(sensors: &SensorMap, today: NaiveDate) -> Vec<Alert> {
    // ---
    sensors
        .iter()
        .filter_map(|(id, sensor)| {
            let due = soonest_due(sensor)?;
            (classify(due, today) == Status::Red).then(|| Alert {
                sensor_id: id.clone(),
                sensor_name: sensor.name.clone(),
                next_due: due,
                message: format!(
                    "CRITICAL SENSOR: {} - urgent maintenance required",
                    sensor.name
                ),
            })
        })
        .collect()
}
