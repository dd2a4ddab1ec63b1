use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ==== Detection Service Metrics ====
    pub static ref DETECT_REQUESTS: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new("detect_requests_total", "Total detect requests handled"),
            &["status"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref DETECTIONS_EMITTED: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new(
                "detections_emitted_total",
                "Detections emitted by the normalizer, per class label",
            ),
            &["label"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref INFERENCE_LATENCY: HistogramVec = {
        let metric = HistogramVec::new(
            HistogramOpts::new(
                "detector_inference_seconds",
                "Forward-pass latency per detector backend",
            ),
            &["detector"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref SYNC_RECORDS: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new(
                "sync_records_total",
                "Record-store sync results per detection",
            ),
            &["outcome"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };
}
