//! Built-in import type definitions, mirroring the backend entity schemas.

use crate::error::CoreError;

use super::rules::{ColumnRule, ImportTypeConfig, Pattern};

// ---------------------------------------------------------------------------
// Enumerated values
// ---------------------------------------------------------------------------

pub const UNIT_TYPES: &[&str] = &["sencillo", "full", "rabon", "tractocamion", "remolque", ""];
pub const UNIT_STATUSES: &[&str] = &["disponible", "en_ruta", "mantenimiento", "bloqueado"];
pub const OPERATOR_STATUSES: &[&str] = &["activo", "inactivo", "vacaciones", "incapacidad"];
pub const CLIENT_STATUSES: &[&str] = &["activo", "pendiente", "incompleto"];
pub const SUPPLIER_STATUSES: &[&str] = &["activo", "inactivo", "suspendido"];
pub const CURRENCIES: &[&str] = &["MXN", "USD"];
pub const LICENSE_TYPES: &[&str] = &["A", "B", "C", "D", "E"];

/// Mexican tax id (RFC): 3-4 letters, 6-digit date, 3-character homoclave.
pub const RFC_PATTERN: &str = r"(?i)^[A-ZÑ&]{3,4}\d{6}[A-Z0-9]{3}$";
const RFC_MESSAGE: &str = "RFC debe tener formato válido (12-13 caracteres)";

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The set of import shapes offered by the bulk upload screen.
#[derive(Debug, Clone)]
pub struct ImportCatalog {
    configs: Vec<ImportTypeConfig>,
}

impl ImportCatalog {
    pub fn new(configs: Vec<ImportTypeConfig>) -> Self {
        Self { configs }
    }

    /// Build the standard catalog. Fails only if a built-in pattern is invalid.
    pub fn builtin() -> Result<Self, CoreError> {
        let rfc = Pattern::new(RFC_PATTERN, Some(RFC_MESSAGE))
            .map_err(|e| CoreError::Internal(format!("Invalid RFC pattern: {e}")))?;

        Ok(Self::new(vec![
            toll_booths(),
            clients(rfc.clone()),
            suppliers(rfc),
            spare_parts(),
            units(),
            operators(),
            routes(),
            tariffs(),
        ]))
    }

    pub fn get(&self, id: &str) -> Option<&ImportTypeConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    /// Like [`get`](Self::get), but an unknown id is a `NotFound` error.
    pub fn require(&self, id: &str) -> Result<&ImportTypeConfig, CoreError> {
        self.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "ImportType",
            id: id.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportTypeConfig> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn import_type(
    id: &str,
    title: &str,
    description: &str,
    backend_endpoint: &str,
    columns: Vec<ColumnRule>,
    sample_data: &[&[&str]],
) -> ImportTypeConfig {
    ImportTypeConfig {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        backend_endpoint: backend_endpoint.to_string(),
        columns,
        sample_data: rows(sample_data),
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

fn toll_booths() -> ImportTypeConfig {
    import_type(
        "casetas",
        "Importar Casetas",
        "Catálogo de casetas de peaje con costos por tipo de vehículo",
        "/toll-booths",
        vec![
            ColumnRule::string("nombre").required().min_length(1).max_length(100),
            ColumnRule::string("autopista").required().min_length(1).max_length(150),
            ColumnRule::number("km").required(),
            ColumnRule::number("costo_2_ejes").required(),
            ColumnRule::number("costo_3_ejes").required(),
            ColumnRule::number("costo_5_ejes").required(),
            ColumnRule::enumeration("acepta_tag", &["SI", "NO"]).required(),
        ],
        &[
            &["Caseta Cuautitlán", "México-Querétaro", "25", "98", "145", "220", "SI"],
            &["Caseta Palmillas", "México-Querétaro", "85", "156", "210", "340", "SI"],
            &["Caseta La Venta", "Autopista del Sol", "12", "45", "68", "102", "NO"],
        ],
    )
}

fn clients(rfc: Pattern) -> ImportTypeConfig {
    import_type(
        "clientes",
        "Importar Clientes",
        "Datos de clientes con información fiscal completa (CFDI 4.0)",
        "/clients",
        vec![
            ColumnRule::string("razon_social").required().min_length(1).max_length(200),
            ColumnRule::string("rfc")
                .required()
                .min_length(12)
                .max_length(13)
                .with_pattern(rfc),
            ColumnRule::string("regimen_fiscal").max_length(10),
            ColumnRule::string("uso_cfdi").required().max_length(10),
            ColumnRule::string("contacto_principal").max_length(100),
            ColumnRule::string("telefono").max_length(20),
            ColumnRule::string("email").max_length(100),
            ColumnRule::string("direccion_fiscal").max_length(300),
            ColumnRule::string("codigo_postal_fiscal")
                .required()
                .min_length(5)
                .max_length(5),
            ColumnRule::number("dias_credito").required(),
            ColumnRule::enumeration("estatus", CLIENT_STATUSES),
        ],
        &[
            &[
                "Corporativo Alfa S.A. de C.V.",
                "CAL021001AA1",
                "601",
                "G03",
                "María García",
                "55 1234 5678",
                "contacto@alfa.com",
                "Av. Reforma 123, Col. Centro",
                "06000",
                "30",
                "activo",
            ],
            &[
                "Logística Beta S. de R.L.",
                "LBE990215BB2",
                "601",
                "G01",
                "Roberto López",
                "33 9876 5432",
                "info@beta.mx",
                "Calle Norte 456, Guadalajara",
                "44100",
                "15",
                "activo",
            ],
        ],
    )
}

fn suppliers(rfc: Pattern) -> ImportTypeConfig {
    import_type(
        "proveedores",
        "Importar Proveedores",
        "Catálogo de proveedores con datos fiscales para Cuentas por Pagar",
        "/suppliers",
        vec![
            ColumnRule::string("razon_social").required().min_length(1).max_length(200),
            ColumnRule::string("rfc")
                .required()
                .min_length(12)
                .max_length(13)
                .with_pattern(rfc),
            ColumnRule::string("email").max_length(100),
            ColumnRule::string("telefono").max_length(20),
            ColumnRule::string("direccion").max_length(300),
            ColumnRule::string("codigo_postal").min_length(5).max_length(5),
            ColumnRule::number("dias_credito").required(),
            ColumnRule::number("limite_credito"),
            ColumnRule::string("contacto_principal").max_length(100),
            ColumnRule::string("categoria").max_length(50),
            ColumnRule::enumeration("estatus", SUPPLIER_STATUSES),
        ],
        &[&[
            "Refaccionaria Industrial SA",
            "RIN980512AB1",
            "compras@refind.mx",
            "55 2222 3333",
            "Av. Industrial 100, Naucalpan",
            "53370",
            "30",
            "500000",
            "Pedro Ramírez",
            "Refacciones",
            "activo",
        ]],
    )
}

fn spare_parts() -> ImportTypeConfig {
    import_type(
        "refacciones",
        "Catálogo de Refacciones",
        "Inventario de refacciones y partes para mantenimiento",
        "/spare-parts",
        vec![
            ColumnRule::string("codigo").required().min_length(1).max_length(50),
            ColumnRule::string("descripcion").required().min_length(1).max_length(200),
            ColumnRule::string("marca").required().max_length(100),
            ColumnRule::string("categoria").required().max_length(50),
            ColumnRule::string("unidad").required().max_length(10),
            ColumnRule::number("precio").required(),
            ColumnRule::number("stock_minimo").required(),
        ],
        &[
            &["REF-001", "Filtro de aceite motor", "Bosch", "Motor", "PZA", "450.00", "10"],
            &["REF-002", "Balata delantera juego", "Brembo", "Frenos", "JGO", "1200.00", "5"],
        ],
    )
}

fn units() -> ImportTypeConfig {
    // Several names match the headers of the spreadsheet the fleet team
    // already maintains, spaces and capitals included.
    import_type(
        "unidades",
        "Importar Unidades",
        "Flota de tractocamiones y remolques",
        "/units",
        vec![
            ColumnRule::string("numero_economico").required(),
            ColumnRule::enumeration("tipo", UNIT_TYPES),
            ColumnRule::string("placas"),
            ColumnRule::string("vin"),
            ColumnRule::string("marca"),
            ColumnRule::string("Tipo 1"),
            ColumnRule::string("modelo"),
            ColumnRule::number("year"),
            ColumnRule::string("Tipo de carga"),
            ColumnRule::enumeration("status", UNIT_STATUSES),
            ColumnRule::string("Tarjeta de Circulacion"),
            ColumnRule::string("Permiso Doble Articulado"),
            ColumnRule::date("seguro_vence"),
            ColumnRule::date("verificacion_humo"),
            ColumnRule::date("Verificacion_Fisico Mecanica"),
        ],
        &[&[
            "Eco-02",
            "full",
            "30AC6J",
            "3AKJGLD5XGSGX1234",
            "FREIGHTLINER",
            "TRACTOCAMION",
            "CASCADIA",
            "2016",
            "IMO",
            "disponible",
            "TC-88812",
            "PDA-1201",
            "2025-12-31",
            "2025-06-01",
            "2025-06-01",
        ]],
    )
}

fn operators() -> ImportTypeConfig {
    import_type(
        "operadores",
        "Importar Operadores",
        "Conductores con licencias, exámenes médicos y datos de contacto",
        "/operators",
        vec![
            ColumnRule::string("name").required().min_length(1).max_length(100),
            ColumnRule::string("license_number").required().min_length(1).max_length(50),
            ColumnRule::enumeration("license_type", LICENSE_TYPES).required(),
            ColumnRule::date("license_expiry").required(),
            ColumnRule::date("medical_check_expiry").required(),
            ColumnRule::string("phone").max_length(20),
            ColumnRule::enumeration("status", OPERATOR_STATUSES),
            ColumnRule::date("hire_date"),
            ColumnRule::string("emergency_contact").max_length(100),
            ColumnRule::string("emergency_phone").max_length(20),
        ],
        &[
            &[
                "Juan Pérez González",
                "SCT-12345678",
                "E",
                "2027-03-15",
                "2026-08-20",
                "55 1234 5678",
                "activo",
                "2020-05-10",
                "María Pérez",
                "55 8765 4321",
            ],
            &[
                "Ricardo Méndez López",
                "SCT-11223344",
                "C",
                "2026-09-25",
                "2026-12-01",
                "81 5555 4444",
                "vacaciones",
                "2021-02-14",
                "Ana Méndez",
                "81 4444 3333",
            ],
        ],
    )
}

fn routes() -> ImportTypeConfig {
    import_type(
        "rutas",
        "Importar Rutas",
        "Rutas predefinidas con orígenes, destinos y tarifas base",
        "/routes",
        vec![
            ColumnRule::string("nombre_ruta").required().min_length(1).max_length(200),
            ColumnRule::string("origen").required().max_length(100),
            ColumnRule::string("destino").required().max_length(100),
            ColumnRule::number("km_aprox").required(),
            ColumnRule::number("tiempo_hrs").required(),
            ColumnRule::number("tarifa_base").required(),
            ColumnRule::string("casetas_incluidas").max_length(500),
        ],
        &[
            &["Norte Express", "CDMX", "Monterrey", "920", "10", "45000", "Cuautitlán,Palmillas,Saltillo"],
            &["Bajío Central", "Guadalajara", "Querétaro", "280", "3", "15000", "Zapotlanejo,La Piedad"],
        ],
    )
}

fn tariffs() -> ImportTypeConfig {
    import_type(
        "tarifas",
        "Matriz de Tarifas",
        "Tarifas por ruta y subcliente con costos de casetas y vigencias",
        "/tariffs",
        vec![
            ColumnRule::string("sub_client_id").required().min_length(1).max_length(50),
            ColumnRule::string("nombre_subcliente").max_length(150),
            ColumnRule::string("nombre_ruta").required().min_length(1).max_length(200),
            ColumnRule::string("origen").required().max_length(100),
            ColumnRule::string("destino").required().max_length(100),
            ColumnRule::enumeration("tipo_unidad", UNIT_TYPES).required(),
            ColumnRule::number("tarifa_base").required(),
            ColumnRule::number("costo_casetas").required(),
            ColumnRule::enumeration("moneda", CURRENCIES).required(),
            ColumnRule::date("vigencia_inicio").required(),
            ColumnRule::date("vigencia_fin").required(),
            ColumnRule::string("notas").max_length(500),
        ],
        &[
            &[
                "SC-001",
                "CEDIS Veracruz - Sabino del Bene",
                "CDMX-Veracruz Express",
                "CDMX",
                "Veracruz Puerto",
                "full",
                "48500",
                "2800",
                "MXN",
                "2026-01-01",
                "2026-12-31",
                "Incluye maniobras de descarga",
            ],
            &[
                "SC-003",
                "Almacén Laredo - Maersk",
                "Norte Premium",
                "Monterrey",
                "Laredo",
                "full",
                "32000",
                "0",
                "USD",
                "2026-02-01",
                "2026-12-31",
                "Frontera - sin casetas",
            ],
        ],
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::bulk_import::sheet::validate_grid;

    fn catalog() -> ImportCatalog {
        ImportCatalog::builtin().unwrap()
    }

    fn template_grid(config: &ImportTypeConfig) -> Vec<Vec<String>> {
        let mut grid = vec![config
            .template_columns()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()];
        grid.extend(config.sample_data.iter().cloned());
        grid
    }

    #[test]
    fn builtin_catalog_has_every_import_type() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "casetas",
                "clientes",
                "proveedores",
                "refacciones",
                "unidades",
                "operadores",
                "rutas",
                "tarifas"
            ]
        );
    }

    #[test]
    fn sample_rows_match_column_count() {
        for config in catalog().iter() {
            for row in &config.sample_data {
                assert_eq!(row.len(), config.columns.len(), "{}", config.id);
            }
        }
    }

    #[test]
    fn sample_data_passes_its_own_rules() {
        for config in catalog().iter() {
            let result = validate_grid(&template_grid(config), config);
            assert!(result.is_valid, "{}: {:?}", config.id, result.errors);
            assert_eq!(result.valid_row_count, config.sample_data.len());
        }
    }

    #[test]
    fn rfc_pattern_is_case_insensitive_and_accepts_enye() {
        let pattern = Pattern::new(RFC_PATTERN, None).unwrap();
        assert!(pattern.is_match("CAL021001AA1"));
        assert!(pattern.is_match("cal021001aa1"));
        assert!(pattern.is_match("NUÑE800101AB1"));
        assert!(!pattern.is_match("BADRFC"));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let catalog = catalog();
        assert!(catalog.get("clientes").is_some());
        assert_matches!(
            catalog.require("llantas"),
            Err(CoreError::NotFound { entity: "ImportType", .. })
        );
    }
}
