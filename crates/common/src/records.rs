//! Contracts for the external vehicle-detection record store.
//!
//! The store itself lives behind a network boundary; the service only relies
//! on the query/create contract below.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One record pushed to the external store, using the store's field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "License_Plate__c")]
    pub plate: String,

    #[serde(rename = "Vehicle_Type__c")]
    pub vehicle_type: String,

    #[serde(rename = "Confidence__c")]
    pub confidence: f32,

    #[serde(rename = "Detection_Time__c")]
    pub detection_time: String,
}

/// Aggregated result of one sync pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Number of detections newly written
    pub saved: u32,

    /// One message per failed query or create, in detection order
    pub errors: Vec<String>,
}

/// Query/create contract against the external record store.
///
/// The duplicate-check predicate is "exact plate match AND created within the
/// current calendar day", resolved by the store's own clock. Implementations
/// must bind the plate as a parameter, never splice it into a query string.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a record with this exact plate exists for the current day.
    async fn plate_logged_today(&self, plate: &str) -> Result<bool>;

    /// Create a new record.
    async fn create_detection(&self, record: &VehicleRecord) -> Result<()>;
}
