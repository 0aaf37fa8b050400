//! Sensor map maintenance tracker.
//!
//! Layout follows the Explicit Module Boundary Pattern (EMBP): each module
//! exposes a small surface and siblings reach each other through the
//! re-exports below rather than through each other's internals.
//! - `models`  – sensor, maintenance and people records (also the file schema)
//! - `status`  – urgency classification, marker colors and alerts
//! - `store`   – full-document load/save behind the `Store` trait
//! - `service` – request-scoped user actions over a store
//! - `routes`  – HTTP gateway for the presentation layer
//! - `config`  – environment-driven configuration

pub mod config;
pub mod models;
pub mod routes;
pub mod service;
pub mod status;
pub mod store;

pub use config::Config;
pub use models::{Coordinates, Maintenance, NewMaintenance, People, Sensor, SensorMap};
pub use service::{
    IndexedMaintenance, MaintenanceService, MapSettings, MapView, Marker, SensorSummary,
    ServiceError, ServiceResult, ValidationError,
};
pub use status::{classify, Alert, Status};
pub use store::{JsonFileStore, MemoryStore, Store, StoreError, StoreResult};
