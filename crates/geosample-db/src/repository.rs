//! Entry repository over a document-store client.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, error, warn};
use uuid::Uuid;

use geosample_core::fields;
use geosample_core::time::format_timestamp;
use geosample_core::{
    Entry, EntryRepository, Error, IndexKind, OperationStatus, QueryOptions, Result, SearchIndexer,
    ServiceJob, StoreClient, StoreConfig,
};

use crate::document::DocumentCodec;

/// Document-store implementation of [`EntryRepository`].
///
/// Each operation is a single blocking round trip to the store; the
/// repository holds no state of its own beyond the configuration.
pub struct DocumentEntryRepository {
    store: Arc<dyn StoreClient>,
    indexer: Option<Arc<dyn SearchIndexer>>,
    codec: DocumentCodec,
    config: StoreConfig,
}

impl DocumentEntryRepository {
    /// Create a repository over the given store client.
    pub fn new(store: Arc<dyn StoreClient>, config: StoreConfig) -> Self {
        Self {
            store,
            indexer: None,
            codec: DocumentCodec::new(config.clone()),
            config,
        }
    }

    /// Attach the external indexing collaborator fed on every save.
    pub fn with_indexer(mut self, indexer: Arc<dyn SearchIndexer>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Fetch the single entry matching an equality filter on `field`.
    ///
    /// Zero or several matches are both failures; the caller never gets an
    /// arbitrary pick.
    async fn find_one(&self, field: &str, value: Value) -> Result<Entry> {
        let filter = json!({ field: value });
        let hits = self
            .store
            .query(&self.config.collection, &filter, QueryOptions::default())
            .await?;

        if hits.len() != 1 {
            warn!(
                subsystem = "db",
                component = "entries",
                op = "find_one",
                field,
                result_count = hits.len(),
                "Lookup did not match exactly one document"
            );
            return Err(Error::NonUniqueMatch {
                field: field.to_string(),
                count: hits.len(),
            });
        }

        self.codec.decode(&hits[0])
    }

    async fn save_inner(&self, entry: &mut Entry) -> OperationStatus {
        // Updates reuse the entry's id; first saves mint a fresh one.
        let id = entry.id.unwrap_or_else(Uuid::now_v7);
        let selector = json!({ (fields::ID): id.to_string() });

        let mut document = match self.codec.encode(entry) {
            Ok(document) => document,
            Err(e) => {
                error!(
                    subsystem = "db",
                    component = "entries",
                    op = "save",
                    external_id = %entry.external_id,
                    error = %e,
                    "Failed to encode entry as a document"
                );
                return OperationStatus::Failed;
            }
        };

        if let Value::Object(map) = &mut document {
            map.insert(fields::ID.to_string(), Value::String(id.to_string()));
            map.insert(
                fields::TIMESTAMP.to_string(),
                Value::String(format_timestamp(&Utc::now())),
            );
        }

        if let Err(e) = self
            .store
            .upsert(&self.config.collection, &selector, &document)
            .await
        {
            error!(
                subsystem = "db",
                component = "entries",
                op = "save",
                external_id = %entry.external_id,
                collection = %self.config.collection,
                error = %e,
                "Failed to upsert entry document"
            );
            return OperationStatus::Failed;
        }

        entry.id = Some(id);

        // The indexed copy carries a derived reference back to the external
        // sample API when one is configured.
        if let Some(base) = &self.config.api_base_url {
            if let Value::Object(map) = &mut document {
                map.insert(
                    fields::URL.to_string(),
                    Value::String(format!("{}{}", base, entry.external_id)),
                );
            }
        }

        match &self.indexer {
            Some(indexer) => match indexer.index(&document).await {
                Ok(()) => OperationStatus::Succeeded,
                Err(e) => {
                    warn!(
                        subsystem = "db",
                        component = "entries",
                        op = "save",
                        external_id = %entry.external_id,
                        error = %e,
                        "Store write succeeded but indexing failed"
                    );
                    OperationStatus::PartiallySucceeded
                }
            },
            None => OperationStatus::Succeeded,
        }
    }
}

#[async_trait]
impl EntryRepository for DocumentEntryRepository {
    async fn save(&self, entry: &mut Entry, job: &mut ServiceJob) -> OperationStatus {
        let status = self.save_inner(entry).await;

        // The outcome is recorded on the job whichever branch was taken.
        job.set_status(status);
        status
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Entry> {
        self.find_one(fields::ID, Value::String(id.to_string()))
            .await
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Entry> {
        self.find_one(fields::EXTERNAL_ID, Value::String(external_id.to_string()))
            .await
    }

    async fn search(&self, filter: &Value, job: &mut ServiceJob) -> Result<Vec<Entry>> {
        let hits = match self
            .store
            .query(&self.config.collection, filter, QueryOptions::default())
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                error!(
                    subsystem = "db",
                    component = "entries",
                    op = "search",
                    collection = %self.config.collection,
                    error = %e,
                    "Search query failed"
                );
                job.set_status(OperationStatus::Failed);
                return Err(e);
            }
        };

        let hit_count = hits.len();
        let mut entries = Vec::with_capacity(hit_count);

        for hit in &hits {
            match self.codec.decode(hit) {
                Ok(entry) => entries.push(entry),
                // A hit that fails to decode is skipped, not fatal.
                Err(e) => {
                    warn!(
                        subsystem = "db",
                        component = "entries",
                        op = "search",
                        error = %e,
                        "Skipping undecodable search hit"
                    );
                }
            }
        }

        let status = if entries.len() == hit_count {
            OperationStatus::Succeeded
        } else if entries.is_empty() {
            OperationStatus::Failed
        } else {
            OperationStatus::PartiallySucceeded
        };

        debug!(
            subsystem = "db",
            component = "entries",
            op = "search",
            result_count = hit_count,
            decoded_count = entries.len(),
            "Search complete"
        );
        job.set_status(status);
        Ok(entries)
    }

    async fn list_all(&self) -> Result<Vec<Entry>> {
        let options = QueryOptions {
            sort_by: Some(fields::NAME.to_string()),
            limit: None,
        };
        let hits = self
            .store
            .query(&self.config.collection, &json!({}), options)
            .await?;

        hits.iter().map(|hit| self.codec.decode(hit)).collect()
    }

    async fn ensure_indexes(&self) -> Result<()> {
        debug!(
            subsystem = "db",
            component = "entries",
            op = "ensure_indexes",
            database = %self.config.database,
            collection = %self.config.collection,
            "Ensuring geospatial index"
        );
        self.store
            .ensure_index(&self.config.collection, fields::LOCATION, IndexKind::GeoSphere)
            .await
    }
}
