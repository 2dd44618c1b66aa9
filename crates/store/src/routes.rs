//! Authorized route catalog (origin/destination pairs operators may run).

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::settings::SettingsStore;

/// Settings key the route list is stored under.
pub const ROUTES_KEY: &str = "rutas_autorizadas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedRoute {
    pub id: String,
    pub origin: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    pub active: bool,
    pub created_on: NaiveDate,
}

/// Payload for [`RouteCatalog::add`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoute {
    pub origin: String,
    pub destination: String,
    pub description: Option<String>,
    pub distance_km: Option<f64>,
    pub estimated_hours: Option<f64>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoute {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub description: Option<String>,
    pub distance_km: Option<f64>,
    pub estimated_hours: Option<f64>,
    pub active: Option<bool>,
}

/// Typed access to the authorized route list.
///
/// The first read of an empty store seeds and persists the default routes.
/// Mutations are serialized so concurrent edits never lose each other.
#[derive(Clone)]
pub struct RouteCatalog {
    store: Arc<dyn SettingsStore>,
    write_lock: Arc<Mutex<()>>,
}

impl RouteCatalog {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<AuthorizedRoute>, StoreError> {
        if let Some(routes) = self.read().await? {
            return Ok(routes);
        }
        let _guard = self.write_lock.lock().await;
        self.read_or_seed().await
    }

    pub async fn active(&self) -> Result<Vec<AuthorizedRoute>, StoreError> {
        let mut routes = self.list().await?;
        routes.retain(|r| r.active);
        Ok(routes)
    }

    /// Add a route; it starts active with today's date.
    pub async fn add(&self, input: NewRoute) -> Result<AuthorizedRoute, StoreError> {
        let origin = required_text("origin", &input.origin)?;
        let destination = required_text("destination", &input.destination)?;
        non_negative("distance_km", input.distance_km)?;
        non_negative("estimated_hours", input.estimated_hours)?;

        let route = AuthorizedRoute {
            id: format!("ruta-{}", uuid::Uuid::new_v4()),
            origin,
            destination,
            description: input.description.filter(|d| !d.trim().is_empty()),
            distance_km: input.distance_km,
            estimated_hours: input.estimated_hours,
            active: true,
            created_on: chrono::Local::now().date_naive(),
        };

        let _guard = self.write_lock.lock().await;
        let mut routes = self.read_or_seed().await?;
        routes.push(route.clone());
        self.persist(&routes).await?;

        tracing::info!(route_id = %route.id, origin = %route.origin, destination = %route.destination, "Authorized route added");
        Ok(route)
    }

    pub async fn update(&self, id: &str, input: UpdateRoute) -> Result<AuthorizedRoute, StoreError> {
        non_negative("distance_km", input.distance_km)?;
        non_negative("estimated_hours", input.estimated_hours)?;

        let _guard = self.write_lock.lock().await;
        let mut routes = self.read_or_seed().await?;
        let route = routes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(origin) = input.origin {
            route.origin = required_text("origin", &origin)?;
        }
        if let Some(destination) = input.destination {
            route.destination = required_text("destination", &destination)?;
        }
        if let Some(description) = input.description {
            route.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if input.distance_km.is_some() {
            route.distance_km = input.distance_km;
        }
        if input.estimated_hours.is_some() {
            route.estimated_hours = input.estimated_hours;
        }
        if let Some(active) = input.active {
            route.active = active;
        }

        let updated = route.clone();
        self.persist(&routes).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut routes = self.read_or_seed().await?;
        let before = routes.len();
        routes.retain(|r| r.id != id);
        if routes.len() == before {
            return Err(not_found(id));
        }
        self.persist(&routes).await?;

        tracing::info!(route_id = %id, "Authorized route deleted");
        Ok(())
    }

    /// Flip the active flag and return the updated route.
    pub async fn toggle_active(&self, id: &str) -> Result<AuthorizedRoute, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut routes = self.read_or_seed().await?;
        let route = routes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;
        route.active = !route.active;

        let toggled = route.clone();
        self.persist(&routes).await?;
        Ok(toggled)
    }

    /// Stored routes, `None` when nothing has been saved yet. Unreadable
    /// documents yield the defaults.
    async fn read(&self) -> Result<Option<Vec<AuthorizedRoute>>, StoreError> {
        let stored = match self.store.load(ROUTES_KEY).await {
            Ok(stored) => stored,
            Err(StoreError::Serde(e)) => {
                tracing::warn!(error = %e, "Route document is corrupt, using defaults");
                return Ok(Some(default_routes()));
            }
            Err(e) => return Err(e),
        };

        let Some(value) = stored else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(routes) => Ok(Some(routes)),
            Err(e) => {
                tracing::warn!(error = %e, "Route document has the wrong shape, using defaults");
                Ok(Some(default_routes()))
            }
        }
    }

    /// Like `read`, seeding the defaults when the store is empty.
    /// Callers must hold `write_lock`.
    async fn read_or_seed(&self) -> Result<Vec<AuthorizedRoute>, StoreError> {
        if let Some(routes) = self.read().await? {
            return Ok(routes);
        }
        let routes = default_routes();
        self.persist(&routes).await?;
        tracing::info!(count = routes.len(), "Seeded default authorized routes");
        Ok(routes)
    }

    async fn persist(&self, routes: &[AuthorizedRoute]) -> Result<(), StoreError> {
        self.store
            .save(ROUTES_KEY, &serde_json::to_value(routes)?)
            .await
    }
}

fn not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        entity: "AuthorizedRoute",
        id: id.to_string(),
    }
}

fn required_text(field: &str, value: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn non_negative(field: &str, value: Option<f64>) -> Result<(), StoreError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(StoreError::Validation(format!(
            "{field} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

/// Routes every installation starts with.
pub fn default_routes() -> Vec<AuthorizedRoute> {
    const DEFAULTS: &[(&str, &str, &str, f64, f64)] = &[
        ("CDMX", "Veracruz Puerto", "Ruta principal hacia el puerto de Veracruz", 420.0, 6.0),
        ("Querétaro", "CDMX", "Corredor industrial Querétaro-CDMX", 220.0, 3.0),
        ("Guadalajara", "Monterrey", "Conexión occidente-noreste", 710.0, 9.0),
        ("Puebla", "CDMX", "Corredor automotriz Puebla", 130.0, 2.0),
        ("Monterrey", "Laredo", "Frontera norte - Comercio exterior", 220.0, 3.0),
        ("CDMX", "Hermosillo", "Ruta larga hacia el noroeste", 1850.0, 22.0),
        ("Veracruz Villa", "Hermosillo", "Corredor costa-noroeste", 2100.0, 26.0),
        ("León", "Tijuana", "Ruta del Bajío a frontera Baja California", 2400.0, 28.0),
    ];
    let created_on = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();

    DEFAULTS
        .iter()
        .enumerate()
        .map(|(i, &(origin, destination, description, km, hours))| AuthorizedRoute {
            id: format!("ruta-{}", i + 1),
            origin: origin.to_string(),
            destination: destination.to_string(),
            description: Some(description.to_string()),
            distance_km: Some(km),
            estimated_hours: Some(hours),
            active: true,
            created_on,
        })
        .collect()
}
