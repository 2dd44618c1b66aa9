//! Pure domain logic for the TMS backend.
//!
//! Nothing in this crate touches the network or the filesystem: bulk-import
//! validation, the import type catalog, CSV grid handling and trip
//! settlement arithmetic all operate on in-memory values supplied by the
//! API layer.

pub mod bulk_import;
pub mod error;
pub mod settlement;
pub mod types;
