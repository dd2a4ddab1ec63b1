//! Raw detector output to typed detection list.

use crate::detector::{RawDetection, CLASSES};
use crate::plates::PlatePool;
use anyhow::{bail, Result};
use common::detections::{Detection, PLATE_NONE};
use tracing::warn;

/// Rows at or below this confidence are dropped. Fixed, not configurable.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Classes that receive a simulated plate string.
pub const VEHICLE_CLASSES: [&str; 3] = ["car", "bus", "motorbike"];

/// Thresholds, clamps, and maps raw detector rows into `Detection` records.
pub struct DetectionNormalizer {
    plates: PlatePool,
}

impl DetectionNormalizer {
    pub fn new(plates: PlatePool) -> Self {
        Self { plates }
    }

    /// Normalize raw rows against the source image dimensions, preserving
    /// detector emission order. Output may be empty.
    pub fn normalize(
        &self,
        rows: &[RawDetection],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();

        for row in rows {
            let raw_confidence = row[2];
            if raw_confidence > 1.0 {
                warn!("Raw confidence {} above 1.0, clamping", raw_confidence);
            }
            let confidence = raw_confidence.clamp(0.0, 1.0);

            if confidence <= CONFIDENCE_THRESHOLD {
                continue;
            }

            // The label table and the network topology must stay in
            // lock-step; an index outside the table aborts the request
            // instead of being dropped silently.
            let class_index = row[1] as i64;
            let label = match usize::try_from(class_index)
                .ok()
                .and_then(|idx| CLASSES.get(idx))
            {
                Some(label) => *label,
                None => bail!(
                    "class index {} outside the {}-entry label table",
                    class_index,
                    CLASSES.len()
                ),
            };

            let bbox = clamp_box([row[3], row[4], row[5], row[6]], width, height);

            let plate = if VEHICLE_CLASSES.contains(&label) {
                self.plates.draw()
            } else {
                PLATE_NONE.to_string()
            };

            detections.push(Detection {
                label: label.to_string(),
                confidence,
                bbox,
                plate,
                time: None,
            });
        }

        Ok(detections)
    }
}

/// Scale normalized corners to pixel coordinates, truncate, and clamp to the
/// image bounds.
fn clamp_box(corners: [f32; 4], width: u32, height: u32) -> [u32; 4] {
    let bounds = [width, height, width, height];
    let mut out = [0u32; 4];
    for (i, corner) in corners.iter().enumerate() {
        let scaled = (*corner * bounds[i] as f32) as i64;
        out[i] = scaled.clamp(0, i64::from(bounds[i])) as u32;
    }
    out
}
