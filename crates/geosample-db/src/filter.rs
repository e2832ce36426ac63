//! Proximity/time-window filter construction.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use geosample_core::fields;
use geosample_core::time::format_timestamp;

/// Builder for the store filter "entries within a sphere distance of a point
/// whose active window matches the given dates".
///
/// Distances are metres along the sphere; a zero bound means "no bound", not
/// a literal zero-metre constraint.
#[derive(Debug, Clone)]
pub struct ProximityFilter {
    latitude: f64,
    longitude: f64,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    min_distance_m: u64,
    max_distance_m: u64,
}

impl ProximityFilter {
    /// Create a filter centred on the given WGS-84 coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            start_date: None,
            end_date: None,
            min_distance_m: 0,
            max_distance_m: 0,
        }
    }

    /// Set the query window's start date.
    pub fn start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Set the query window's end date.
    pub fn end_date(mut self, date: DateTime<Utc>) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Set the minimum sphere distance in metres; zero means no lower bound.
    pub fn min_distance_m(mut self, metres: u64) -> Self {
        self.min_distance_m = metres;
        self
    }

    /// Set the maximum sphere distance in metres; zero means no upper bound.
    pub fn max_distance_m(mut self, metres: u64) -> Self {
        self.max_distance_m = metres;
        self
    }

    /// Build the store filter document.
    ///
    /// The output is an independent tree; the builder is untouched and can be
    /// reused.
    pub fn build(&self) -> Value {
        let mut near = Map::new();
        near.insert(
            "$geometry".to_string(),
            json!({
                (fields::GEOMETRY_TYPE): fields::POINT,
                // GeoJSON order: longitude first.
                (fields::COORDINATES): [self.longitude, self.latitude],
            }),
        );
        if self.min_distance_m > 0 {
            near.insert("$minDistance".to_string(), json!(self.min_distance_m));
        }
        if self.max_distance_m > 0 {
            near.insert("$maxDistance".to_string(), json!(self.max_distance_m));
        }

        let mut filter = Map::new();
        filter.insert(
            fields::LOCATION.to_string(),
            json!({ "$nearSphere": Value::Object(near) }),
        );

        // Wire contract: the query's start date bounds the stored end date
        // from above, the query's end date bounds the stored start date from
        // below. Existing deployments depend on this exact shape.
        if let Some(start) = &self.start_date {
            filter.insert(
                fields::END_DATE.to_string(),
                json!({ "$lte": format_timestamp(start) }),
            );
        }
        if let Some(end) = &self.end_date {
            filter.insert(
                fields::START_DATE.to_string(),
                json!({ "$gte": format_timestamp(end) }),
            );
        }

        Value::Object(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bare_filter_has_only_near_sphere() {
        let filter = ProximityFilter::new(52.1, 1.2).build();

        assert_eq!(
            filter,
            json!({
                "location": {
                    "$nearSphere": {
                        "$geometry": { "type": "Point", "coordinates": [1.2, 52.1] },
                    }
                }
            })
        );
    }

    #[test]
    fn test_full_filter_wire_shape() {
        let filter = ProximityFilter::new(52.1, 1.2)
            .start_date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .end_date(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
            .max_distance_m(5000)
            .build();

        assert_eq!(
            filter,
            json!({
                "location": {
                    "$nearSphere": {
                        "$geometry": { "type": "Point", "coordinates": [1.2, 52.1] },
                        "$maxDistance": 5000,
                    }
                },
                "end_date": { "$lte": "2024-01-01T00:00:00Z" },
                "date": { "$gte": "2024-06-01T00:00:00Z" },
            })
        );
    }

    #[test]
    fn test_min_distance_bound_is_emitted() {
        let filter = ProximityFilter::new(-33.86, 151.21)
            .min_distance_m(250)
            .build();
        assert_eq!(filter["location"]["$nearSphere"]["$minDistance"], json!(250));
        assert!(filter["location"]["$nearSphere"]
            .as_object()
            .unwrap()
            .get("$maxDistance")
            .is_none());
    }

    #[test]
    fn test_single_date_emits_single_clause() {
        let filter = ProximityFilter::new(52.1, 1.2)
            .start_date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .build();

        let map = filter.as_object().unwrap();
        assert!(map.contains_key("end_date"));
        assert!(!map.contains_key("date"));
    }

    #[test]
    fn test_builder_is_reusable() {
        let builder = ProximityFilter::new(10.0, 20.0).max_distance_m(100);
        assert_eq!(builder.build(), builder.build());
    }
}
