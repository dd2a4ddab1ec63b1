//! Mock detection backend for tests and demonstrations.

use super::{ObjectDetector, RawDetection};
use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;

/// Deterministic detector that replays a fixed set of raw rows.
pub struct MockDetector {
    rows: Vec<RawDetection>,
}

impl MockDetector {
    pub fn new(rows: Vec<RawDetection>) -> Self {
        Self { rows }
    }

    /// One high-confidence car in the upper-left quadrant of the frame.
    pub fn single_car() -> Self {
        Self::new(vec![[0.0, 7.0, 0.92, 0.1, 0.1, 0.4, 0.4]])
    }

    /// No candidates at all.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ObjectDetector for MockDetector {
    fn id(&self) -> &'static str {
        "mock_detector"
    }

    async fn infer(&self, _image: &DynamicImage) -> Result<Vec<RawDetection>> {
        Ok(self.rows.clone())
    }
}
