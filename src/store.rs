//! Persistence for the sensor and people collections.
//!
//! Both collections are stored as whole documents and replaced in full on
//! every save. There is no partial-write protection and no locking across
//! processes; two writers racing on the same file means last write wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{People, SensorMap};

// ---

/// Persistence errors. A missing file is not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt data in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Full-document load/save contract for both collections.
pub trait Store {
    fn load_sensors(&self) -> StoreResult<SensorMap>;
    fn save_sensors(&self, sensors: &SensorMap) -> StoreResult<()>;
    fn load_people(&self) -> StoreResult<People>;
    fn save_people(&self, people: &People) -> StoreResult<()>;
}

/// Store backed by two pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    sensors_path: PathBuf,
    people_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(sensors_path: impl Into<PathBuf>, people_path: impl Into<PathBuf>) -> Self {
        Self {
            sensors_path: sensors_path.into(),
            people_path: people_path.into(),
        }
    }

    /// Store with the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("sensors.json"), dir.join("people.json"))
    }

    pub fn sensors_path(&self) -> &Path {
        &self.sensors_path
    }

    pub fn people_path(&self) -> &Path {
        &self.people_path
    }
}

impl Store for JsonFileStore {
    fn load_sensors(&self) -> StoreResult<SensorMap> {
        read_document(&self.sensors_path)
    }

    fn save_sensors(&self, sensors: &SensorMap) -> StoreResult<()> {
        write_document(&self.sensors_path, sensors)
    }

    fn load_people(&self) -> StoreResult<People> {
        read_document(&self.people_path)
    }

    fn save_people(&self, people: &People) -> StoreResult<()> {
        write_document(&self.people_path, people)
    }
}

/// Read a whole document, defaulting to an empty collection when the file
/// does not exist.
fn read_document<T>(path: &Path) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    // ---
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No data at {}, starting empty", path.display());
            return Ok(T::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite a whole document with 4-space indented JSON.
fn write_document<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    // ---
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(StoreError::Encode)?;

    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, buf).map_err(io_err)?;

    info!("Saved {}", path.display());
    Ok(())
}

/// In-process store holding both collections in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sensors: Mutex<SensorMap>,
    people: Mutex<People>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load_sensors(&self) -> StoreResult<SensorMap> {
        let sensors = self.sensors.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(sensors.clone())
    }

    fn save_sensors(&self, sensors: &SensorMap) -> StoreResult<()> {
        let mut current = self.sensors.lock().map_err(|_| StoreError::Poisoned)?;
        *current = sensors.clone();
        Ok(())
    }

    fn load_people(&self) -> StoreResult<People> {
        let people = self.people.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(people.clone())
    }

    fn save_people(&self, people: &People) -> StoreResult<()> {
        let mut current = self.people.lock().map_err(|_| StoreError::Poisoned)?;
        *current = people.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::{Coordinates, Maintenance, Sensor};
    use chrono::NaiveDate;

    fn sample_sensors() -> SensorMap {
        // ---
        let mut sensor = Sensor::new("Lake buoy", Coordinates::new(-3.35, -64.7));
        sensor.maintenances.push(Maintenance {
            date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            description: "Battery swap".to_string(),
            next_due: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
            responsible: "Ana".to_string(),
        });

        let mut sensors = SensorMap::new();
        sensors.insert("id-1".to_string(), sensor);
        sensors.insert("id-2".to_string(), Sensor::new("Dock", Coordinates::new(1.0, 2.0)));
        sensors
    }

    #[test]
    fn test_missing_files_load_empty() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());

        assert!(store.load_sensors().unwrap().is_empty());
        assert!(store.load_people().unwrap().is_empty());
    }

    #[test]
    fn test_sensor_roundtrip() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let sensors = sample_sensors();

        store.save_sensors(&sensors).unwrap();
        assert_eq!(store.load_sensors().unwrap(), sensors);
    }

    #[test]
    fn test_people_keep_order() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let people = vec!["Zé".to_string(), "Ana".to_string(), "Bia".to_string()];

        store.save_people(&people).unwrap();
        assert_eq!(store.load_people().unwrap(), people);
    }

    #[test]
    fn test_save_replaces_whole_document() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());

        store.save_sensors(&sample_sensors()).unwrap();
        store.save_sensors(&SensorMap::new()).unwrap();
        assert!(store.load_sensors().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_fails_loudly() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.sensors_path(), "{ not json").unwrap();

        let err = store.load_sensors().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");

        // File is left as-is for the user to inspect.
        assert_eq!(fs::read_to_string(store.sensors_path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.people_path(), r#"{"Ana": 1}"#).unwrap();

        assert!(matches!(
            store.load_people(),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_documents_use_four_space_indent() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        store.save_people(&vec!["Ana".to_string()]).unwrap();

        let text = fs::read_to_string(store.people_path()).unwrap();
        assert_eq!(text, "[\n    \"Ana\"\n]");
    }

    #[test]
    fn test_save_creates_data_dir() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path().join("nested").join("data"));

        store.save_people(&vec!["Ana".to_string()]).unwrap();
        assert_eq!(store.load_people().unwrap(), vec!["Ana".to_string()]);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        // ---
        let store = MemoryStore::new();
        let sensors = sample_sensors();

        assert!(store.load_sensors().unwrap().is_empty());
        store.save_sensors(&sensors).unwrap();
        assert_eq!(store.load_sensors().unwrap(), sensors);
    }
}
