use crate::config::SalesforceConfig;
use crate::detector::ObjectDetector;
use crate::normalize::DetectionNormalizer;
use crate::store::RestRecordStore;
use std::sync::Arc;
use tracing::error;

/// Shared per-process state behind the HTTP handlers. The detector handle is
/// loaded once at startup and read by every in-flight request; a `None`
/// detector means the service runs degraded.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    node_id: String,
    detector: Option<Arc<dyn ObjectDetector>>,
    normalizer: DetectionNormalizer,
    salesforce: Option<SalesforceConfig>,
}

impl AppState {
    pub fn new(
        node_id: String,
        detector: Option<Arc<dyn ObjectDetector>>,
        normalizer: DetectionNormalizer,
        salesforce: Option<SalesforceConfig>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                node_id,
                detector,
                normalizer,
                salesforce,
            }),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.inner.node_id
    }

    pub fn detector(&self) -> Option<&Arc<dyn ObjectDetector>> {
        self.inner.detector.as_ref()
    }

    pub fn model_loaded(&self) -> bool {
        self.inner.detector.is_some()
    }

    pub fn normalizer(&self) -> &DetectionNormalizer {
        &self.inner.normalizer
    }

    /// Build a fresh record-store client, or report none when credentials
    /// are missing or the client cannot be constructed.
    pub fn record_store(&self) -> Option<RestRecordStore> {
        let config = self.inner.salesforce.as_ref()?;
        match RestRecordStore::connect(config) {
            Ok(store) => Some(store),
            Err(e) => {
                error!("Record store connection error: {}", e);
                None
            }
        }
    }
}
