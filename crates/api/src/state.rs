use std::sync::Arc;

use tms_core::bulk_import::ImportCatalog;
use tms_core::error::CoreError;
use tms_store::{RouteCatalog, SettingsStore, UnitTypeCatalog};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Import type definitions, built once at startup.
    pub imports: Arc<ImportCatalog>,
    pub unit_types: UnitTypeCatalog,
    pub routes: RouteCatalog,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn SettingsStore>) -> Result<Self, CoreError> {
        Ok(Self {
            config: Arc::new(config),
            imports: Arc::new(ImportCatalog::builtin()?),
            unit_types: UnitTypeCatalog::new(Arc::clone(&store)),
            routes: RouteCatalog::new(store),
        })
    }
}
