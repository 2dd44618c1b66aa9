//! Configurable unit types (Sencillo, Full, Rabón, ...).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::settings::SettingsStore;

/// Settings key the unit type list is stored under.
pub const UNIT_TYPES_KEY: &str = "tipos_unidad";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Emoji shown next to the name.
    #[serde(default)]
    pub icon: String,
    pub active: bool,
    pub created_at: NaiveDate,
}

/// Typed access to the unit type list.
///
/// Reads never fail on bad data: a missing or unreadable document yields the
/// built-in defaults, which are not written back until someone saves.
/// Saves are serialized.
#[derive(Clone)]
pub struct UnitTypeCatalog {
    store: Arc<dyn SettingsStore>,
    write_lock: Arc<Mutex<()>>,
}

impl UnitTypeCatalog {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<UnitType>, StoreError> {
        let stored = match self.store.load(UNIT_TYPES_KEY).await {
            Ok(stored) => stored,
            Err(StoreError::Serde(e)) => {
                tracing::warn!(error = %e, "Unit type document is corrupt, using defaults");
                return Ok(default_unit_types());
            }
            Err(e) => return Err(e),
        };

        let Some(value) = stored else {
            return Ok(default_unit_types());
        };
        match serde_json::from_value(value) {
            Ok(types) => Ok(types),
            Err(e) => {
                tracing::warn!(error = %e, "Unit type document has the wrong shape, using defaults");
                Ok(default_unit_types())
            }
        }
    }

    /// Active types only, for selection lists.
    pub async fn active(&self) -> Result<Vec<UnitType>, StoreError> {
        let mut types = self.list().await?;
        types.retain(|t| t.active);
        Ok(types)
    }

    /// Look up by id, or by name ignoring case.
    pub async fn find(&self, id_or_name: &str) -> Result<Option<UnitType>, StoreError> {
        let needle = id_or_name.to_lowercase();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|t| t.id == id_or_name || t.name.to_lowercase() == needle))
    }

    /// Display label: `"<icon> <name>"`, or the input capitalized when unknown.
    pub async fn label(&self, id_or_name: &str) -> Result<String, StoreError> {
        if let Some(t) = self.find(id_or_name).await? {
            return Ok(format!("{} {}", t.icon, t.name));
        }
        let mut chars = id_or_name.chars();
        Ok(match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        })
    }

    /// Replace the whole list.
    pub async fn replace_all(&self, types: Vec<UnitType>) -> Result<Vec<UnitType>, StoreError> {
        let mut seen = HashSet::new();
        for t in &types {
            if t.id.trim().is_empty() || t.name.trim().is_empty() {
                return Err(StoreError::Validation(
                    "unit types need a non-empty id and name".to_string(),
                ));
            }
            if !seen.insert(t.id.as_str()) {
                return Err(StoreError::Validation(format!(
                    "duplicate unit type id '{}'",
                    t.id
                )));
            }
        }

        let document = serde_json::to_value(&types)?;
        let _guard = self.write_lock.lock().await;
        self.store.save(UNIT_TYPES_KEY, &document).await?;
        tracing::info!(count = types.len(), "Unit types replaced");
        Ok(types)
    }
}

/// Unit types every installation starts with.
pub fn default_unit_types() -> Vec<UnitType> {
    const DEFAULTS: &[(&str, &str, &str, &str)] = &[
        ("tipo-sencillo", "Sencillo", "Tractocamión con un solo remolque", "🚛"),
        ("tipo-full", "Full", "Tractocamión con doble remolque", "🚚"),
        ("tipo-rabon", "Rabón", "Camión rígido de 3 ejes", "📦"),
        ("tipo-caja-seca", "Caja Seca", "Remolque cerrado para carga general", "📦"),
        ("tipo-refrigerado", "Refrigerado", "Remolque con sistema de refrigeración", "❄️"),
        ("tipo-plataforma", "Plataforma", "Remolque abierto para carga pesada", "🛻"),
        ("tipo-cama-baja", "Cama Baja", "Plataforma baja para maquinaria", "🏗️"),
        ("tipo-montacargas", "Montacargas", "Equipo de maniobras interno", "🏭"),
        ("tipo-utilitario", "Utilitario", "Vehículos ligeros de apoyo", "🚗"),
    ];
    let created_at = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    DEFAULTS
        .iter()
        .map(|&(id, name, description, icon)| UnitType {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            active: true,
            created_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::settings::MemoryStore;

    fn catalog() -> (Arc<MemoryStore>, UnitTypeCatalog) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), UnitTypeCatalog::new(store))
    }

    #[tokio::test]
    async fn missing_document_yields_defaults_without_writing() {
        let (store, catalog) = catalog();
        let types = catalog.list().await.unwrap();

        assert_eq!(types.len(), 9);
        assert_eq!(types[0].id, "tipo-sencillo");
        assert!(store.load(UNIT_TYPES_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_shape_falls_back_to_defaults() {
        let (store, catalog) = catalog();
        store
            .save(UNIT_TYPES_KEY, &json!({"not": "a list"}))
            .await
            .unwrap();

        assert_eq!(catalog.list().await.unwrap(), default_unit_types());
    }

    #[tokio::test]
    async fn find_matches_id_or_name_case_insensitively() {
        let (_, catalog) = catalog();

        assert_eq!(catalog.find("tipo-full").await.unwrap().unwrap().name, "Full");
        assert_eq!(catalog.find("rabón").await.unwrap().unwrap().id, "tipo-rabon");
        assert_eq!(catalog.find("CAJA SECA").await.unwrap().unwrap().id, "tipo-caja-seca");
        assert!(catalog.find("tolva").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn label_falls_back_to_capitalized_input() {
        let (_, catalog) = catalog();

        assert_eq!(catalog.label("full").await.unwrap(), "🚚 Full");
        assert_eq!(catalog.label("tolva").await.unwrap(), "Tolva");
        assert_eq!(catalog.label("").await.unwrap(), "");
    }

    #[tokio::test]
    async fn replace_all_persists_and_filters_active() {
        let (_, catalog) = catalog();
        let mut types = default_unit_types();
        types.truncate(3);
        types[1].active = false;

        catalog.replace_all(types).await.unwrap();

        assert_eq!(catalog.list().await.unwrap().len(), 3);
        let active: Vec<String> = catalog
            .active()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(active, vec!["tipo-sencillo", "tipo-rabon"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_replacements_leave_one_complete_list() {
        let (_, catalog) = catalog();

        let tasks: Vec<_> = (1..=6)
            .map(|n| {
                let catalog = catalog.clone();
                tokio::spawn(async move {
                    let mut types = default_unit_types();
                    types.truncate(n);
                    catalog.replace_all(types).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = catalog.list().await.unwrap();
        assert!((1..=6).contains(&stored.len()));
        assert_eq!(stored, default_unit_types()[..stored.len()].to_vec());
    }

    #[tokio::test]
    async fn replace_all_rejects_duplicate_ids() {
        let (_, catalog) = catalog();
        let mut types = default_unit_types();
        types[1].id = types[0].id.clone();

        assert_matches!(
            catalog.replace_all(types).await,
            Err(StoreError::Validation(_))
        );
    }
}
