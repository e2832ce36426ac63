//! Wire field names for entry documents and their queries.
//!
//! Both the document store and the downstream search index address fields by
//! these exact names, so they are part of the interoperability contract and
//! must not drift. Coordinate order inside [`COORDINATES`] is
//! `[longitude, latitude]` (GeoJSON).

/// Store-assigned document identifier.
pub const ID: &str = "_id";

/// Display name of the sample.
pub const NAME: &str = "name";

/// Caller-supplied business key, unique per logical sample.
pub const EXTERNAL_ID: &str = "marti_id";

/// Name of the sampling site.
pub const SITE_NAME: &str = "site_name";

/// Free-text comments about the sample.
pub const DESCRIPTION: &str = "description";

/// GeoJSON point sub-document holding the sampling position.
pub const LOCATION: &str = "location";

/// Coordinate pair inside the location sub-document.
pub const COORDINATES: &str = "coordinates";

/// GeoJSON geometry type discriminator.
pub const GEOMETRY_TYPE: &str = "type";

/// GeoJSON geometry type for a single position.
pub const POINT: &str = "Point";

/// Sampling (start) date.
pub const START_DATE: &str = "date";

/// End of the sample's validity window.
pub const END_DATE: &str = "end_date";

/// Taxonomic classifiers for the sample.
pub const TAXA: &str = "taxa";

/// Write timestamp refreshed on every upsert.
pub const TIMESTAMP: &str = "timestamp";

/// Derived external reference appended to the indexed document.
pub const URL: &str = "url";
