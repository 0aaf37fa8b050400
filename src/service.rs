//! Maintenance use-case service.
//!
//! Every operation is one request-scoped cycle against the [`Store`]: reload
//! the full collections, validate input, mutate, save immediately, and return
//! the outcome. Nothing is cached between calls, so status is always computed
//! from what is on disk right now.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Coordinates, Maintenance, NewMaintenance, People, Sensor, SensorMap};
use crate::status::{self, Alert, Status};
use crate::store::{Store, StoreError};

// ---

/// Rejected user input. Nothing is saved when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("sensor name must not be empty")]
    EmptySensorName,
    #[error("person name must not be empty")]
    EmptyPersonName,
    #[error("person '{0}' is already registered")]
    DuplicatePerson(String),
    #[error("a responsible person must be selected")]
    MissingResponsible,
    #[error("responsible person '{0}' is not registered")]
    UnknownResponsible(String),
    #[error("maintenance description must not be empty")]
    EmptyDescription,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("sensor not found: {0}")]
    SensorNotFound(String),
    #[error("person not found: {0}")]
    PersonNotFound(String),
    #[error("maintenance #{index} not found on sensor {sensor_id}")]
    MaintenanceNotFound { sensor_id: String, index: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Initial map position handed to the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        // Tefé, Amazonas
        Self {
            center: Coordinates::new(-3.367, -64.716),
            zoom: 12,
        }
    }
}

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub sensor_id: String,
    pub position: Coordinates,
    pub label: String,
    pub color: &'static str,
}

/// Everything the map surface needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

/// Sensor summary used by selectors and listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSummary {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub maintenance_count: usize,
    pub status: Option<Status>,
    pub next_due: Option<NaiveDate>,
}

/// A maintenance record together with its position in entry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedMaintenance {
    pub index: usize,
    #[serde(flatten)]
    pub record: Maintenance,
}

/// Use-case service over a [`Store`].
pub struct MaintenanceService<S: Store> {
    store: S,
    map: MapSettings,
}

impl<S: Store> MaintenanceService<S> {
    pub fn new(store: S) -> Self {
        Self::with_map(store, MapSettings::default())
    }

    pub fn with_map(store: S, map: MapSettings) -> Self {
        Self { store, map }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- sensors

    /// Sensors sorted by name, with their current status.
    pub fn list_sensors(&self, today: NaiveDate) -> ServiceResult<Vec<SensorSummary>> {
        // ---
        let sensors = self.store.load_sensors()?;
        let mut summaries: Vec<SensorSummary> = sensors
            .iter()
            .map(|(id, s)| SensorSummary {
                id: id.clone(),
                name: s.name.clone(),
                coordinates: s.coordinates,
                maintenance_count: s.maintenances.len(),
                status: status::sensor_status(s, today),
                next_due: status::soonest_due(s),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    pub fn get_sensor(&self, id: &str) -> ServiceResult<Sensor> {
        let mut sensors = self.store.load_sensors()?;
        sensors
            .remove(id)
            .ok_or_else(|| ServiceError::SensorNotFound(id.to_string()))
    }

    /// Register a sensor at a clicked map position. Returns the new id.
    pub fn register_sensor(&self, name: &str, coordinates: Coordinates) -> ServiceResult<String> {
        // ---
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptySensorName.into());
        }

        let mut sensors = self.store.load_sensors()?;
        let id = new_sensor_id(&sensors);
        sensors.insert(id.clone(), Sensor::new(name, coordinates));
        self.store.save_sensors(&sensors)?;

        info!("Registered sensor '{}' ({}) at {:?}", name, id, coordinates);
        Ok(id)
    }

    /// Delete a sensor and its history. Returns the removed sensor.
    pub fn delete_sensor(&self, id: &str) -> ServiceResult<Sensor> {
        // ---
        let mut sensors = self.store.load_sensors()?;
        let removed = sensors
            .remove(id)
            .ok_or_else(|| ServiceError::SensorNotFound(id.to_string()))?;
        self.store.save_sensors(&sensors)?;

        info!("Deleted sensor '{}' ({})", removed.name, id);
        Ok(removed)
    }

    // --- maintenance

    /// Log a maintenance performed `today` on a sensor.
    pub fn add_maintenance(
        &self,
        sensor_id: &str,
        input: NewMaintenance,
        today: NaiveDate,
    ) -> ServiceResult<Maintenance> {
        // ---
        let responsible = input
            .responsible
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(ValidationError::MissingResponsible)?;
        if input.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }

        let people = self.store.load_people()?;
        if !people.iter().any(|p| p == responsible) {
            return Err(ValidationError::UnknownResponsible(responsible.to_string()).into());
        }

        let mut sensors = self.store.load_sensors()?;
        let sensor = sensors
            .get_mut(sensor_id)
            .ok_or_else(|| ServiceError::SensorNotFound(sensor_id.to_string()))?;

        let record = Maintenance {
            date: today,
            description: input.description,
            next_due: input.next_due,
            responsible: responsible.to_string(),
        };
        sensor.maintenances.push(record.clone());
        self.store.save_sensors(&sensors)?;

        info!(
            "Logged maintenance on {} by {}, next due {}",
            sensor_id, record.responsible, record.next_due
        );
        Ok(record)
    }

    /// Remove the record at `index` (entry order) from a sensor.
    pub fn remove_maintenance(&self, sensor_id: &str, index: usize) -> ServiceResult<Maintenance> {
        // ---
        let mut sensors = self.store.load_sensors()?;
        let sensor = sensors
            .get_mut(sensor_id)
            .ok_or_else(|| ServiceError::SensorNotFound(sensor_id.to_string()))?;

        if index >= sensor.maintenances.len() {
            return Err(ServiceError::MaintenanceNotFound {
                sensor_id: sensor_id.to_string(),
                index,
            });
        }
        let removed = sensor.maintenances.remove(index);
        self.store.save_sensors(&sensors)?;

        info!("Removed maintenance #{} from {}", index, sensor_id);
        Ok(removed)
    }

    /// Most recently performed maintenance; earliest entered wins a tie.
    pub fn latest_maintenance(&self, sensor_id: &str) -> ServiceResult<Option<Maintenance>> {
        // ---
        let sensor = self.get_sensor(sensor_id)?;
        let latest = sensor
            .maintenances
            .into_iter()
            .reduce(|best, m| if m.date > best.date { m } else { best });
        Ok(latest)
    }

    /// Full history, newest performed date first. Ties keep entry order.
    pub fn maintenance_history(&self, sensor_id: &str) -> ServiceResult<Vec<IndexedMaintenance>> {
        // ---
        let sensor = self.get_sensor(sensor_id)?;
        let mut history: Vec<IndexedMaintenance> = sensor
            .maintenances
            .into_iter()
            .enumerate()
            .map(|(index, record)| IndexedMaintenance { index, record })
            .collect();
        history.sort_by(|a, b| b.record.date.cmp(&a.record.date));
        Ok(history)
    }

    // --- people

    pub fn list_people(&self) -> ServiceResult<People> {
        Ok(self.store.load_people()?)
    }

    /// Register a responsible person. Names are trimmed and must be unique.
    pub fn add_person(&self, name: &str) -> ServiceResult<()> {
        // ---
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyPersonName.into());
        }

        let mut people = self.store.load_people()?;
        if people.iter().any(|p| p == name) {
            warn!("Rejected duplicate person '{}'", name);
            return Err(ValidationError::DuplicatePerson(name.to_string()).into());
        }
        people.push(name.to_string());
        self.store.save_people(&people)?;

        info!("Registered person '{}'", name);
        Ok(())
    }

    /// Remove a person. Existing maintenance records keep the name as text.
    pub fn remove_person(&self, name: &str) -> ServiceResult<()> {
        // ---
        let mut people = self.store.load_people()?;
        let pos = people
            .iter()
            .position(|p| p == name)
            .ok_or_else(|| ServiceError::PersonNotFound(name.to_string()))?;
        people.remove(pos);
        self.store.save_people(&people)?;

        info!("Removed person '{}'", name);
        Ok(())
    }

    // --- map & alerts

    /// Markers for every sensor, colored by current status.
    pub fn map_view(&self, today: NaiveDate) -> ServiceResult<MapView> {
        // ---
        let sensors = self.store.load_sensors()?;
        let markers = sensors
            .iter()
            .map(|(id, s)| Marker {
                sensor_id: id.clone(),
                position: s.coordinates,
                label: s.name.clone(),
                color: status::marker_color(s, today),
            })
            .collect::<Vec<_>>();

        debug!("Map view with {} markers", markers.len());
        Ok(MapView {
            center: self.map.center,
            zoom: self.map.zoom,
            markers,
        })
    }

    /// Warnings for every sensor in red status.
    pub fn alerts(&self, today: NaiveDate) -> ServiceResult<Vec<Alert>> {
        // ---
        let sensors = self.store.load_sensors()?;
        let alerts = status::alerts(&sensors, today);
        for alert in &alerts {
            warn!("{}", alert.message);
        }
        Ok(alerts)
    }
}

fn new_sensor_id(existing: &SensorMap) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !existing.contains_key(&id) {
            return id;
        }
    }
}
