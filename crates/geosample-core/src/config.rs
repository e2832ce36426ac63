//! Service configuration for the entry store.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};

/// Which optional document fields a deployment persists.
///
/// Two document shapes exist in the wild; they are configurations of the same
/// entity, not separate code paths. The decoder reads whichever optional
/// fields are present, so either deployment can read the other's documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Single sampling date plus site, description, and taxa fields.
    #[default]
    SampleDetails,
    /// Start and end dates only.
    DateRange,
}

/// Configuration for the entry store and its surrounding collaborators.
///
/// `database` and `collection` are used verbatim on every store call.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Database name.
    pub database: String,
    /// Collection name holding entry documents.
    pub collection: String,
    /// Base URL of the external sample API; the save path appends the
    /// entry's external id to derive the indexed reference.
    pub api_base_url: Option<String>,
    /// Fixed tag fields appended verbatim to every encoded document for the
    /// downstream search index.
    pub extra_tags: Map<String, Value>,
    /// Which optional fields the codec emits.
    pub schema: SchemaVariant,
}

impl StoreConfig {
    /// Create a configuration for the given database and collection.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            ..Default::default()
        }
    }

    /// Set the external API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Add a fixed index tag emitted on every document.
    pub fn extra_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_tags
            .insert(key.into(), Value::String(value.into()));
        self
    }

    /// Select the document schema variant.
    pub fn schema(mut self, schema: SchemaVariant) -> Self {
        self.schema = schema;
        self
    }

    /// Read the host's service-config document.
    ///
    /// `database` and `collection` are required; a missing `marti_url` is
    /// tolerated with a warning since not every deployment runs the external
    /// sample API.
    pub fn from_json(config: &Value) -> Result<Self> {
        let database = config
            .get("database")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Config("no database specified".to_string()))?;
        let collection = config
            .get("collection")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Config("no collection specified".to_string()))?;
        let api_base_url = config
            .get("marti_url")
            .and_then(Value::as_str)
            .map(str::to_string);

        if api_base_url.is_none() {
            warn!(
                subsystem = "config",
                component = "store",
                "No sample API URL specified"
            );
        }

        Ok(Self {
            database: database.to_string(),
            collection: collection.to_string(),
            api_base_url,
            ..Default::default()
        })
    }
}
