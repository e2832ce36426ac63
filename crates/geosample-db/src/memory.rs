//! In-memory store client for tests and local development.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use geosample_core::fields;
use geosample_core::time::parse_timestamp;
use geosample_core::{Error, IndexKind, QueryOptions, Result, StoreClient};

/// Mean Earth radius in metres, as used by spherical-distance queries.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A [`StoreClient`] holding its collections in process memory.
///
/// Evaluates the filter shapes this subsystem emits: field equality,
/// `$nearSphere` with optional distance bounds, and `$lte`/`$gte`
/// comparisons over canonical timestamps. Every query is a full scan;
/// declared indexes are recorded but not consulted.
#[derive(Debug, Default)]
pub struct MemoryStoreClient {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    indexes: RwLock<Vec<(String, String, String)>>,
}

impl MemoryStoreClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Indexes declared so far, as `(collection, field, kind)` tuples.
    pub async fn declared_indexes(&self) -> Vec<(String, String, String)> {
        self.indexes.read().await.clone()
    }
}

#[async_trait]
impl StoreClient for MemoryStoreClient {
    async fn upsert(&self, collection: &str, selector: &Value, document: &Value) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut existing = None;
        for (idx, doc) in docs.iter().enumerate() {
            if matches_filter(doc, selector)? {
                existing = Some(idx);
                break;
            }
        }

        match existing {
            Some(idx) => docs[idx] = document.clone(),
            None => docs.push(document.clone()),
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Value,
        options: QueryOptions,
    ) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        let mut hits = Vec::new();
        for doc in docs {
            if matches_filter(doc, filter)? {
                hits.push(doc.clone());
            }
        }
        drop(collections);

        if let Some(sort_field) = &options.sort_by {
            hits.sort_by(|a, b| {
                let a = a.get(sort_field).and_then(Value::as_str).unwrap_or("");
                let b = b.get(sort_field).and_then(Value::as_str).unwrap_or("");
                a.cmp(b)
            });
        }
        if let Some(limit) = options.limit {
            hits.truncate(limit);
        }

        Ok(hits)
    }

    async fn ensure_index(&self, collection: &str, field: &str, kind: IndexKind) -> Result<()> {
        self.indexes.write().await.push((
            collection.to_string(),
            field.to_string(),
            kind.as_str().to_string(),
        ));
        Ok(())
    }
}

/// Evaluate a filter document against a stored document.
fn matches_filter(doc: &Value, filter: &Value) -> Result<bool> {
    let clauses = filter
        .as_object()
        .ok_or_else(|| Error::Store("filter must be a document".to_string()))?;

    for (field, condition) in clauses {
        if !matches_clause(doc, field, condition)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches_clause(doc: &Value, field: &str, condition: &Value) -> Result<bool> {
    match condition.as_object() {
        Some(operators) if operators.keys().any(|key| key.starts_with('$')) => {
            for (op, operand) in operators {
                let matched = match op.as_str() {
                    "$nearSphere" => near_sphere_matches(doc, field, operand)?,
                    "$lte" => compare_timestamps(doc, field, operand)?
                        .is_some_and(|ordering| ordering != Ordering::Greater),
                    "$gte" => compare_timestamps(doc, field, operand)?
                        .is_some_and(|ordering| ordering != Ordering::Less),
                    other => {
                        return Err(Error::Store(format!(
                            "unsupported filter operator \"{}\"",
                            other
                        )))
                    }
                };
                if !matched {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        // Anything without operators is a plain equality test.
        _ => Ok(doc.get(field) == Some(condition)),
    }
}

/// Compare a stored timestamp field against a filter bound.
///
/// `None` means the document has no such field, which never matches a bound.
fn compare_timestamps(doc: &Value, field: &str, operand: &Value) -> Result<Option<Ordering>> {
    let bound = operand
        .as_str()
        .ok_or_else(|| Error::Store(format!("\"{}\" bound must be a canonical timestamp", field)))?;
    let bound = parse_timestamp(bound)
        .map_err(|_| Error::Store(format!("\"{}\" bound is not a canonical timestamp", field)))?;

    let Some(raw) = doc.get(field).and_then(Value::as_str) else {
        return Ok(None);
    };
    let value = parse_timestamp(raw).map_err(|_| {
        Error::Store(format!(
            "stored \"{}\" value \"{}\" is not a canonical timestamp",
            field, raw
        ))
    })?;

    Ok(Some(value.cmp(&bound)))
}

fn near_sphere_matches(doc: &Value, field: &str, operand: &Value) -> Result<bool> {
    let centre = operand
        .get("$geometry")
        .and_then(|geometry| geometry.get(fields::COORDINATES))
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Store("$nearSphere requires a $geometry point".to_string()))?;
    let (centre_lon, centre_lat) = coordinate_pair(centre)?;

    // Documents without a well-formed location simply do not match.
    let Some(coords) = doc
        .get(field)
        .and_then(|location| location.get(fields::COORDINATES))
        .and_then(Value::as_array)
    else {
        return Ok(false);
    };
    let Ok((lon, lat)) = coordinate_pair(coords) else {
        return Ok(false);
    };

    let distance = haversine_distance_m(centre_lat, centre_lon, lat, lon);

    let min = operand
        .get("$minDistance")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    if distance < min {
        return Ok(false);
    }
    if let Some(max) = operand.get("$maxDistance").and_then(Value::as_f64) {
        if distance > max {
            return Ok(false);
        }
    }
    Ok(true)
}

fn coordinate_pair(values: &[Value]) -> Result<(f64, f64)> {
    if values.len() != 2 {
        return Err(Error::Store(
            "coordinates must hold exactly two values".to_string(),
        ));
    }
    match (values[0].as_f64(), values[1].as_f64()) {
        (Some(lon), Some(lat)) => Ok((lon, lat)),
        _ => Err(Error::Store("coordinates must be numeric".to_string())),
    }
}

/// Great-circle distance between two WGS-84 positions, in metres.
fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn located(id: &str, lon: f64, lat: f64) -> Value {
        json!({
            "_id": id,
            "location": { "type": "Point", "coordinates": [lon, lat] },
        })
    }

    #[test]
    fn test_haversine_known_distance() {
        // Norwich city centre to Norwich railway station, roughly 1.2 km.
        let d = haversine_distance_m(52.6293, 1.2921, 52.6271, 1.3063);
        assert!((900.0..1500.0).contains(&d), "got {}", d);
    }

    #[test]
    fn test_equality_clause() {
        let doc = json!({ "marti_id": "sample-1" });
        assert!(matches_filter(&doc, &json!({ "marti_id": "sample-1" })).unwrap());
        assert!(!matches_filter(&doc, &json!({ "marti_id": "sample-2" })).unwrap());
    }

    #[test]
    fn test_near_sphere_respects_bounds() {
        let near = located("a", 1.2921, 52.6293);
        let filter = json!({
            "location": {
                "$nearSphere": {
                    "$geometry": { "type": "Point", "coordinates": [1.3063, 52.6271] },
                    "$minDistance": 500,
                    "$maxDistance": 5000,
                }
            }
        });
        assert!(matches_filter(&near, &filter).unwrap());

        let too_close = located("b", 1.3063, 52.6271);
        assert!(!matches_filter(&too_close, &filter).unwrap());

        let too_far = located("c", -0.1278, 51.5074);
        assert!(!matches_filter(&too_far, &filter).unwrap());
    }

    #[test]
    fn test_document_without_location_never_matches_near_sphere() {
        let doc = json!({ "_id": "a" });
        let filter = json!({
            "location": {
                "$nearSphere": {
                    "$geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
                }
            }
        });
        assert!(!matches_filter(&doc, &filter).unwrap());
    }

    #[test]
    fn test_date_bounds() {
        let doc = json!({ "date": "2024-03-15T09:30:00Z" });
        assert!(matches_filter(&doc, &json!({ "date": { "$gte": "2024-01-01T00:00:00Z" } })).unwrap());
        assert!(!matches_filter(&doc, &json!({ "date": { "$gte": "2024-06-01T00:00:00Z" } })).unwrap());
        assert!(matches_filter(&doc, &json!({ "date": { "$lte": "2024-03-15T09:30:00Z" } })).unwrap());
    }

    #[test]
    fn test_missing_date_field_never_matches_bound() {
        let doc = json!({ "_id": "a" });
        assert!(!matches_filter(&doc, &json!({ "end_date": { "$lte": "2024-01-01" } })).unwrap());
    }

    #[test]
    fn test_unsupported_operator_is_an_error() {
        let doc = json!({ "date": "2024-03-15" });
        assert!(matches_filter(&doc, &json!({ "date": { "$regex": "2024.*" } })).is_err());
    }

    #[tokio::test]
    async fn test_query_sorts_and_limits() {
        let store = MemoryStoreClient::new();
        for (id, name) in [("1", "c"), ("2", "a"), ("3", "b")] {
            store
                .upsert(
                    "entries",
                    &json!({ "_id": id }),
                    &json!({ "_id": id, "name": name }),
                )
                .await
                .unwrap();
        }

        let options = QueryOptions {
            sort_by: Some("name".to_string()),
            limit: Some(2),
        };
        let hits = store.query("entries", &json!({}), options).await.unwrap();
        let names: Vec<&str> = hits
            .iter()
            .map(|doc| doc["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_matching_document() {
        let store = MemoryStoreClient::new();
        let selector = json!({ "_id": "1" });

        store
            .upsert("entries", &selector, &json!({ "_id": "1", "name": "first" }))
            .await
            .unwrap();
        store
            .upsert("entries", &selector, &json!({ "_id": "1", "name": "second" }))
            .await
            .unwrap();

        assert_eq!(store.count("entries").await, 1);
        let hits = store
            .query("entries", &selector, QueryOptions::default())
            .await
            .unwrap();
        assert_eq!(hits[0]["name"], "second");
    }
}
