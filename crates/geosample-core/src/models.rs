//! Core domain models for geosample.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// ENTRY TYPES
// =============================================================================

/// Reference to the user who submitted an entry.
///
/// Entries copy the reference at the construction boundary and own their copy
/// outright; there is no shared or borrowed state to release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    /// Display name as supplied by the host framework.
    pub name: String,
}

/// Opaque access-control handle carried by an entry.
///
/// Never evaluated here; the host framework decides what the groups mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsGroup {
    pub groups: Vec<String>,
}

/// A geotagged, time-stamped biological sample record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-owned identifier; `None` until the first successful save.
    pub id: Option<Uuid>,
    /// Submitting user, when known.
    pub owner: Option<UserRef>,
    /// Access-control handle; defaulted when the caller supplies none.
    pub permissions: PermissionsGroup,
    /// Display name of the sample.
    pub name: String,
    /// Business key, distinct from the store id.
    pub external_id: String,
    /// WGS-84 latitude; always paired with `longitude`.
    pub latitude: f64,
    /// WGS-84 longitude; always paired with `latitude`.
    pub longitude: f64,
    /// When the sample was taken.
    pub start_time: DateTime<Utc>,
    /// End of the validity window; `None` for a point-in-time record.
    pub end_time: Option<DateTime<Utc>>,
    pub site_name: Option<String>,
    pub comments: Option<String>,
    /// Taxonomic classifiers in insertion order.
    pub taxon_ids: Vec<String>,
}

/// Typed inputs for constructing an [`Entry`], as the host hands them over.
///
/// `start_time` is required for a valid entry but modeled as an option here
/// because the host's parameter set may leave it unset.
#[derive(Debug, Clone, Default)]
pub struct CreateEntryRequest {
    pub id: Option<Uuid>,
    pub owner: Option<UserRef>,
    pub permissions: Option<PermissionsGroup>,
    pub name: String,
    pub external_id: String,
    pub site_name: Option<String>,
    pub comments: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub taxon_ids: Vec<String>,
}

impl Entry {
    /// Construct an entry from caller-supplied fields.
    ///
    /// Fails when `external_id` or `name` is blank or `start_time` is unset.
    /// On success the entry owns every field outright; no partially built
    /// value exists on the failure path.
    pub fn new(req: CreateEntryRequest) -> Result<Self> {
        if req.external_id.trim().is_empty() {
            return Err(Error::Validation(
                "external id is a required field".to_string(),
            ));
        }
        if req.name.trim().is_empty() {
            return Err(Error::Validation("name is a required field".to_string()));
        }
        let start_time = req
            .start_time
            .ok_or_else(|| Error::Validation("start time is a required field".to_string()))?;

        Ok(Self {
            id: req.id,
            owner: req.owner,
            permissions: req.permissions.unwrap_or_default(),
            name: req.name,
            external_id: req.external_id,
            latitude: req.latitude,
            longitude: req.longitude,
            start_time,
            end_time: req.end_time,
            site_name: req.site_name,
            comments: req.comments,
            taxon_ids: req.taxon_ids,
        })
    }
}

// =============================================================================
// JOB TYPES
// =============================================================================

/// Outcome of a persistence operation, recorded on the job handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    FailedToStart,
    Failed,
    PartiallySucceeded,
    Succeeded,
}

/// Validation message scoped to a named input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The host framework's record of a single operation's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceJob {
    pub id: Uuid,
    pub status: OperationStatus,
    pub field_errors: Vec<FieldError>,
}

impl ServiceJob {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            status: OperationStatus::Pending,
            field_errors: Vec::new(),
        }
    }

    /// Record the operation outcome.
    pub fn set_status(&mut self, status: OperationStatus) {
        self.status = status;
    }

    /// Attach a validation message scoped to a named input field.
    ///
    /// Used by the parameter-validation glue above this subsystem.
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }
}

impl Default for ServiceJob {
    fn default() -> Self {
        Self::new()
    }
}
