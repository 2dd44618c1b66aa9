//! Bulk import validation engine.
//!
//! Column rules and import types, the cell and sheet validators, report
//! shaping, the built-in catalog, and CSV grid handling. Validation never
//! fails: every problem in an upload comes back as a finding.

pub mod catalog;
pub mod cell;
pub mod grid;
pub mod report;
pub mod rules;
pub mod sheet;

pub use catalog::ImportCatalog;
pub use cell::validate_cell;
pub use report::{ReportOptions, ValidationReport};
pub use rules::{ColumnKind, ColumnRule, ImportTypeConfig, Pattern, ValidationError, ValidationResult};
pub use sheet::validate_grid;
