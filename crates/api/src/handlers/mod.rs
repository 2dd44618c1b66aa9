pub mod catalogs;
pub mod import_types;
pub mod settlements;
