//! # geosample-core
//!
//! Core types, traits, and abstractions for the geosample library.
//!
//! This crate provides the entry model, the job/outcome model, the error
//! type, canonical timestamp handling, the wire field names, and the
//! collaborator traits that the persistence crate implements or consumes.

pub mod config;
pub mod error;
pub mod fields;
pub mod logging;
pub mod models;
pub mod time;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{SchemaVariant, StoreConfig};
pub use error::{Error, Result};
pub use models::*;
pub use time::{format_timestamp, parse_timestamp};
pub use traits::*;
