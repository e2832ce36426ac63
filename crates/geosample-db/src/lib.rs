//! # geosample-db
//!
//! Document-store persistence layer for geosample: the entry/document codec,
//! the proximity filter builder, the repository implementing
//! [`geosample_core::EntryRepository`], and an in-memory store client used by
//! tests and local development.

pub mod document;
pub mod filter;
pub mod memory;
pub mod repository;

pub use document::DocumentCodec;
pub use filter::ProximityFilter;
pub use memory::MemoryStoreClient;
pub use repository::DocumentEntryRepository;
