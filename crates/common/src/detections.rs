//! Wire contracts for the detection endpoint.

use serde::{Deserialize, Serialize};

use crate::records::SyncOutcome;

/// Plate sentinel carried by non-vehicle detections.
pub const PLATE_NONE: &str = "N/A";

/// One recognized object instance in the source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Object class from the detector's fixed vocabulary
    pub label: String,

    /// Detection confidence, clamped to [0.0, 1.0]
    pub confidence: f32,

    /// Pixel corners `[start_x, start_y, end_x, end_y]`, clamped to the image
    #[serde(rename = "box")]
    pub bbox: [u32; 4],

    /// Simulated plate string, or the `"N/A"` sentinel
    pub plate: String,

    /// Detection timestamp, when the producer supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Request body for `POST /detect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectRequest {
    /// Base64 data-URL encoded image
    pub image: Option<String>,

    /// Push novel detections to the external record store
    #[serde(default)]
    pub save_to_salesforce: bool,
}

/// Response body for `POST /detect`.
#[derive(Debug, Clone, Serialize)]
pub struct DetectResponse {
    pub detections: Vec<Detection>,
    pub salesforce_status: SyncStatus,
}

/// Outcome of the optional sync stage, as reported to the caller.
#[derive(Debug, Clone)]
pub enum SyncStatus {
    /// The request did not ask for a sync
    Skipped,
    /// No record-store client could be built from the environment
    CredentialsMissing,
    /// A sync pass ran; per-item results aggregated
    Completed(SyncOutcome),
}

impl Serialize for SyncStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            SyncStatus::Skipped => serializer.serialize_str("Skipped"),
            SyncStatus::CredentialsMissing => serializer.serialize_str("Credentials Missing"),
            SyncStatus::Completed(outcome) => outcome.serialize(serializer),
        }
    }
}
