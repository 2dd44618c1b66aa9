//! Persistence for the configurable catalogs.
//!
//! A small key/value [`SettingsStore`](settings::SettingsStore) holds JSON
//! documents; [`UnitTypeCatalog`](unit_types::UnitTypeCatalog) and
//! [`RouteCatalog`](routes::RouteCatalog) give typed access on top of it.

pub mod error;
pub mod routes;
pub mod settings;
pub mod unit_types;

pub use error::StoreError;
pub use routes::{AuthorizedRoute, NewRoute, RouteCatalog, UpdateRoute};
pub use settings::{JsonFileStore, MemoryStore, SettingsStore};
pub use unit_types::{UnitType, UnitTypeCatalog};
