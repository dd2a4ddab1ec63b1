//! Object detection backends.
//!
//! The service holds the detector as a trait object so the HTTP layer and the
//! tests can run against the mock backend; `MobileNetSsd` is the production
//! implementation.

pub mod mobilenet_ssd;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;

/// One raw candidate row from the detector:
/// `[_, class_index, confidence, x1, y1, x2, y2]` with corner coordinates
/// normalized to [0, 1].
pub type RawDetection = [f32; 7];

/// The fixed class vocabulary of the detector network. Index 0 is the
/// reserved `background` class. This table must stay in lock-step with the
/// model topology.
pub const CLASSES: [&str; 21] = [
    "background",
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Core contract all detection backends implement.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Unique backend identifier.
    fn id(&self) -> &'static str;

    /// Run a forward pass over the pixel buffer and return the raw candidate
    /// rows, untouched by thresholding or clamping.
    async fn infer(&self, image: &DynamicImage) -> Result<Vec<RawDetection>>;
}
