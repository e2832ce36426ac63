//! Entry/document mapping.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use geosample_core::fields;
use geosample_core::time::{format_timestamp, parse_timestamp};
use geosample_core::{CreateEntryRequest, Entry, Error, Result, SchemaVariant, StoreConfig};

/// Maps entries to their store-native document form and back.
///
/// Which optional fields are emitted follows the configured
/// [`SchemaVariant`]; the decoder reads any optional field that is present
/// regardless of variant, so documents written under either shape decode.
#[derive(Debug, Clone)]
pub struct DocumentCodec {
    config: StoreConfig,
}

impl DocumentCodec {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Encode an entry as a store document.
    ///
    /// Absent optional fields are omitted entirely, never written as null.
    pub fn encode(&self, entry: &Entry) -> Result<Value> {
        if !(entry.latitude.is_finite() && entry.longitude.is_finite()) {
            return Err(Error::Encoding(format!(
                "entry \"{}\" has a non-finite coordinate pair",
                entry.name
            )));
        }

        let mut doc = Map::new();

        if let Some(id) = entry.id {
            doc.insert(fields::ID.to_string(), Value::String(id.to_string()));
        }

        doc.insert(fields::NAME.to_string(), Value::String(entry.name.clone()));
        doc.insert(
            fields::EXTERNAL_ID.to_string(),
            Value::String(entry.external_id.clone()),
        );

        // Stored as a GeoJSON Point so the store can run geospatial queries
        // over it. GeoJSON puts the longitude first.
        doc.insert(
            fields::LOCATION.to_string(),
            json!({
                (fields::GEOMETRY_TYPE): fields::POINT,
                (fields::COORDINATES): [entry.longitude, entry.latitude],
            }),
        );

        doc.insert(
            fields::START_DATE.to_string(),
            Value::String(format_timestamp(&entry.start_time)),
        );

        match self.config.schema {
            SchemaVariant::SampleDetails => {
                if let Some(site) = &entry.site_name {
                    doc.insert(fields::SITE_NAME.to_string(), Value::String(site.clone()));
                }
                if let Some(comments) = &entry.comments {
                    doc.insert(
                        fields::DESCRIPTION.to_string(),
                        Value::String(comments.clone()),
                    );
                }
                match entry.taxon_ids.len() {
                    0 => {}
                    // A single taxon stays a bare string for compatibility
                    // with documents already in the store.
                    1 => {
                        doc.insert(
                            fields::TAXA.to_string(),
                            Value::String(entry.taxon_ids[0].clone()),
                        );
                    }
                    _ => {
                        doc.insert(
                            fields::TAXA.to_string(),
                            Value::Array(
                                entry
                                    .taxon_ids
                                    .iter()
                                    .cloned()
                                    .map(Value::String)
                                    .collect(),
                            ),
                        );
                    }
                }
            }
            SchemaVariant::DateRange => {
                if let Some(end) = &entry.end_time {
                    doc.insert(
                        fields::END_DATE.to_string(),
                        Value::String(format_timestamp(end)),
                    );
                }
            }
        }

        for (key, value) in &self.config.extra_tags {
            doc.insert(key.clone(), value.clone());
        }

        Ok(Value::Object(doc))
    }

    /// Decode a stored document back into an entry.
    ///
    /// Requires an id, a name, an external id, and a two-number coordinate
    /// pair. A missing date field is not a decode error, but an entry cannot
    /// be constructed without one, so the failure surfaces from construction.
    /// Decoded entries carry no owner and a fresh default permissions group;
    /// neither is persisted in the document.
    pub fn decode(&self, document: &Value) -> Result<Entry> {
        let raw_id = required_str(document, fields::ID)?;
        let id = Uuid::parse_str(raw_id)
            .map_err(|_| Error::Encoding(format!("\"{}\" is not a valid store id", raw_id)))?;
        let name = required_str(document, fields::NAME)?;
        let external_id = required_str(document, fields::EXTERNAL_ID)?;

        let (longitude, latitude) = decode_coordinates(document)?;

        let start_time = optional_timestamp(document, fields::START_DATE)?;
        let end_time = optional_timestamp(document, fields::END_DATE)?;

        let site_name = document
            .get(fields::SITE_NAME)
            .and_then(Value::as_str)
            .map(str::to_string);
        let comments = document
            .get(fields::DESCRIPTION)
            .and_then(Value::as_str)
            .map(str::to_string);

        let taxon_ids = match document.get(fields::TAXA) {
            None => Vec::new(),
            Some(Value::String(taxon)) => vec![taxon.clone()],
            Some(Value::Array(values)) => {
                let mut taxa = Vec::with_capacity(values.len());
                for value in values {
                    match value.as_str() {
                        Some(taxon) => taxa.push(taxon.to_string()),
                        None => {
                            return Err(Error::Encoding(format!(
                                "\"{}\" entries must be strings",
                                fields::TAXA
                            )))
                        }
                    }
                }
                taxa
            }
            Some(_) => {
                return Err(Error::Encoding(format!(
                    "\"{}\" must be a string or an array",
                    fields::TAXA
                )))
            }
        };

        Entry::new(CreateEntryRequest {
            id: Some(id),
            owner: None,
            permissions: None,
            name: name.to_string(),
            external_id: external_id.to_string(),
            site_name,
            comments,
            latitude,
            longitude,
            start_time,
            end_time,
            taxon_ids,
        })
    }
}

fn required_str<'a>(document: &'a Value, field: &str) -> Result<&'a str> {
    document.get(field).and_then(Value::as_str).ok_or_else(|| {
        Error::Encoding(format!("document is missing required field \"{}\"", field))
    })
}

fn optional_timestamp(document: &Value, field: &str) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    match document.get(field) {
        None => Ok(None),
        Some(value) => {
            let raw = value.as_str().ok_or_else(|| {
                Error::Encoding(format!("\"{}\" must be a string timestamp", field))
            })?;
            let parsed = parse_timestamp(raw).map_err(|_| {
                Error::Encoding(format!("unparseable \"{}\" value \"{}\"", field, raw))
            })?;
            Ok(Some(parsed))
        }
    }
}

fn decode_coordinates(document: &Value) -> Result<(f64, f64)> {
    let coords = document
        .get(fields::LOCATION)
        .and_then(|location| location.get(fields::COORDINATES))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::Encoding(format!(
                "document has no \"{}.{}\" array",
                fields::LOCATION,
                fields::COORDINATES
            ))
        })?;

    if coords.len() != 2 {
        return Err(Error::Encoding(format!(
            "\"{}\" must hold exactly two values, got {}",
            fields::COORDINATES,
            coords.len()
        )));
    }

    match (coords[0].as_f64(), coords[1].as_f64()) {
        // GeoJSON order: longitude first.
        (Some(longitude), Some(latitude)) => Ok((longitude, latitude)),
        _ => Err(Error::Encoding(format!(
            "\"{}\" must hold two numbers",
            fields::COORDINATES
        ))),
    }
}
