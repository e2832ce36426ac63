//! Collaborator interfaces consumed and exposed by the core.
//!
//! These traits define the seams between this subsystem and its host: the
//! document-store session, the external search indexer, and the repository
//! surface the host's submission/search glue calls. Concrete implementations
//! live in `geosample-db`, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Entry, OperationStatus, ServiceJob};

// =============================================================================
// STORE CLIENT
// =============================================================================

/// Options applied to a store query.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Sort ascending by this document field.
    pub sort_by: Option<String>,
    /// Cap the number of returned documents.
    pub limit: Option<usize>,
}

/// Index kinds the store is asked to maintain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Spherical geospatial index over a GeoJSON field.
    GeoSphere,
    /// Plain single-field value index.
    Value,
}

impl IndexKind {
    /// The store-native name of this index kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::GeoSphere => "2dsphere",
            IndexKind::Value => "single",
        }
    }
}

/// Connection/session abstraction over the document store.
///
/// One operation completes before the next begins; the client is expected to
/// pool connections itself if callers overlap operations.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Write-or-update the document matching `selector`.
    async fn upsert(&self, collection: &str, selector: &Value, document: &Value) -> Result<()>;

    /// Run a filter over a collection and return every matching document.
    async fn query(
        &self,
        collection: &str,
        filter: &Value,
        options: QueryOptions,
    ) -> Result<Vec<Value>>;

    /// Ensure an index of the given kind exists on a field.
    async fn ensure_index(&self, collection: &str, field: &str, kind: IndexKind) -> Result<()>;
}

// =============================================================================
// SEARCH INDEXER
// =============================================================================

/// External indexing collaborator fed with every saved document.
#[async_trait]
pub trait SearchIndexer: Send + Sync {
    async fn index(&self, document: &Value) -> Result<()>;
}

// =============================================================================
// ENTRY REPOSITORY
// =============================================================================

/// Repository for entry persistence and retrieval.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Upsert an entry, recording the outcome on `job`.
    ///
    /// Assigns a fresh store id to `entry` on its first successful save.
    /// Indexing/enrichment failures after a successful write degrade the
    /// outcome to [`OperationStatus::PartiallySucceeded`] rather than
    /// failing it.
    async fn save(&self, entry: &mut Entry, job: &mut ServiceJob) -> OperationStatus;

    /// Fetch the single entry with the given store id.
    ///
    /// Zero or several matches are both failures, never a silent pick.
    async fn find_by_id(&self, id: Uuid) -> Result<Entry>;

    /// Fetch the single entry with the given business key.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Entry>;

    /// Run a prebuilt filter and decode every hit, recording the outcome on
    /// `job`.
    ///
    /// Hits that fail to decode are skipped, not fatal; the job status
    /// distinguishes a clean sweep from a degraded one.
    async fn search(&self, filter: &Value, job: &mut ServiceJob) -> Result<Vec<Entry>>;

    /// Every entry, sorted by name.
    async fn list_all(&self) -> Result<Vec<Entry>>;

    /// Create the indexes the proximity queries rely on.
    async fn ensure_indexes(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_kind_store_names() {
        assert_eq!(IndexKind::GeoSphere.as_str(), "2dsphere");
        assert_eq!(IndexKind::Value.as_str(), "single");
    }
}
