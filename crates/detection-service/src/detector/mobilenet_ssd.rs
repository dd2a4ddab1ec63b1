//! MobileNet-SSD detection backend using ONNX Runtime.

use super::{ObjectDetector, RawDetection};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use ndarray::{Array, IxDyn};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileNetSsdConfig {
    /// Path to the ONNX model artifact
    pub model_path: String,

    /// Number of intra-operation threads
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,

    /// Number of inter-operation threads
    #[serde(default = "default_inter_threads")]
    pub inter_threads: usize,
}

fn default_intra_threads() -> usize {
    4
}

fn default_inter_threads() -> usize {
    1
}

impl Default for MobileNetSsdConfig {
    fn default() -> Self {
        Self {
            model_path: "models/mobilenet_ssd.onnx".to_string(),
            intra_threads: default_intra_threads(),
            inter_threads: default_inter_threads(),
        }
    }
}

/// MobileNet-SSD session wrapper. The network topology is fixed: 300x300 BGR
/// input with per-channel mean subtraction and scaling, and a `[1, 1, N, 7]`
/// output tensor of candidate rows.
pub struct MobileNetSsd {
    config: MobileNetSsdConfig,
    session: Mutex<Session>,
}

impl MobileNetSsd {
    /// Network input edge length.
    pub const INPUT_SIZE: u32 = 300;
    /// Scale factor applied after mean subtraction.
    const SCALE: f32 = 0.007843;
    /// Per-channel mean.
    const MEAN: f32 = 127.5;
    const OUTPUT_NAME: &'static str = "detection_out";

    /// Load the network from the configured model artifact. Fails when the
    /// artifact is missing so startup can degrade to detection-unavailable.
    pub fn load(config: MobileNetSsdConfig) -> Result<Self> {
        if !Path::new(&config.model_path).exists() {
            bail!("model artifact not found at {}", config.model_path);
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .with_inter_threads(config.inter_threads)?
            .commit_from_file(&config.model_path)
            .with_context(|| format!("failed to load model from {}", config.model_path))?;

        tracing::info!(
            "Loaded MobileNet-SSD model from {} (input {}x{})",
            config.model_path,
            Self::INPUT_SIZE,
            Self::INPUT_SIZE
        );

        Ok(Self {
            config,
            session: Mutex::new(session),
        })
    }

    /// Resize and normalize the pixel buffer into the network's input blob.
    /// The Caffe export expects BGR channel order.
    fn preprocess(&self, img: &DynamicImage) -> Array<f32, IxDyn> {
        let size = Self::INPUT_SIZE;
        let resized = img.resize_exact(size, size, image::imageops::FilterType::Triangle);
        let rgb = resized.to_rgb8();

        let mut input = Array::zeros(IxDyn(&[1, 3, size as usize, size as usize]));
        for (x, y, pixel) in rgb.enumerate_pixels() {
            // channels stored blue, green, red
            input[[0, 0, y as usize, x as usize]] = (f32::from(pixel[2]) - Self::MEAN) * Self::SCALE;
            input[[0, 1, y as usize, x as usize]] = (f32::from(pixel[1]) - Self::MEAN) * Self::SCALE;
            input[[0, 2, y as usize, x as usize]] = (f32::from(pixel[0]) - Self::MEAN) * Self::SCALE;
        }

        input
    }
}

#[async_trait]
impl ObjectDetector for MobileNetSsd {
    fn id(&self) -> &'static str {
        "mobilenet_ssd"
    }

    async fn infer(&self, image: &DynamicImage) -> Result<Vec<RawDetection>> {
        let input = self.preprocess(image);
        let input_tensor = Value::from_array(input)?;

        let inference_start = std::time::Instant::now();
        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("failed to lock session: {}", e))?;
        let outputs = session.run(ort::inputs![input_tensor])?;

        telemetry::metrics::INFERENCE_LATENCY
            .with_label_values(&[self.id()])
            .observe(inference_start.elapsed().as_secs_f64());

        let output_value = outputs
            .get(Self::OUTPUT_NAME)
            .context("detector produced no output tensor")?;
        let (shape, data) = output_value.try_extract_tensor::<f32>()?;

        let shape_usize: Vec<usize> = shape.as_ref().iter().map(|&d| d as usize).collect();
        let output = Array::from_shape_vec(IxDyn(&shape_usize), data.to_vec())?;

        if output.ndim() != 4 || output.shape()[3] != 7 {
            bail!(
                "unexpected output tensor shape {:?} from {}",
                output.shape(),
                self.config.model_path
            );
        }

        // Candidate rows live on the third axis of the [1, 1, N, 7] tensor.
        let rows = output.shape()[2];
        let mut raw = Vec::with_capacity(rows);
        for i in 0..rows {
            let mut row = [0f32; 7];
            for (c, slot) in row.iter_mut().enumerate() {
                *slot = output[[0, 0, i, c]];
            }
            raw.push(row);
        }

        Ok(raw)
    }
}
