//! Duplicate-suppressing synchronization of detections to the record store.

use common::detections::{Detection, PLATE_NONE};
use common::records::{RecordStore, SyncOutcome, VehicleRecord};
use tracing::{error, info};

/// Result of pushing one detection.
enum ItemOutcome {
    /// A new record was written
    Saved,
    /// Already recorded today; the same sighting event
    Duplicate,
    /// The query or the create failed; message kept for the caller
    Failed(String),
}

async fn sync_one(detection: &Detection, store: &dyn RecordStore) -> ItemOutcome {
    match store.plate_logged_today(&detection.plate).await {
        Ok(true) => {
            info!("Skipping duplicate plate: {}", detection.plate);
            ItemOutcome::Duplicate
        }
        Ok(false) => {
            let record = VehicleRecord {
                plate: detection.plate.clone(),
                vehicle_type: detection.label.clone(),
                confidence: detection.confidence,
                detection_time: detection
                    .time
                    .clone()
                    .unwrap_or_else(|| "Now".to_string()),
            };
            match store.create_detection(&record).await {
                Ok(()) => {
                    info!("Saved detection for plate {}", detection.plate);
                    ItemOutcome::Saved
                }
                Err(e) => ItemOutcome::Failed(e.to_string()),
            }
        }
        Err(e) => ItemOutcome::Failed(e.to_string()),
    }
}

/// Push each detection carrying a usable plate, in list order. One item's
/// failure never aborts the remaining detections, and nothing is retried
/// within a single pass.
pub async fn sync_detections(detections: &[Detection], store: &dyn RecordStore) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for detection in detections {
        if detection.plate.is_empty() || detection.plate == PLATE_NONE {
            continue;
        }

        match sync_one(detection, store).await {
            ItemOutcome::Saved => {
                outcome.saved += 1;
                telemetry::metrics::SYNC_RECORDS
                    .with_label_values(&["saved"])
                    .inc();
            }
            ItemOutcome::Duplicate => {
                telemetry::metrics::SYNC_RECORDS
                    .with_label_values(&["duplicate"])
                    .inc();
            }
            ItemOutcome::Failed(message) => {
                error!("Error saving {}: {}", detection.plate, message);
                telemetry::metrics::SYNC_RECORDS
                    .with_label_values(&["failed"])
                    .inc();
                outcome.errors.push(message);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        logged_today: Mutex<HashSet<String>>,
        failing_plates: HashSet<String>,
        queries: Mutex<u32>,
    }

    impl MemoryStore {
        fn failing(plates: &[&str]) -> Self {
            Self {
                failing_plates: plates.iter().map(|p| p.to_string()).collect(),
                ..Self::default()
            }
        }

        fn queries(&self) -> u32 {
            *self.queries.lock().unwrap()
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn plate_logged_today(&self, plate: &str) -> Result<bool> {
            *self.queries.lock().unwrap() += 1;
            if self.failing_plates.contains(plate) {
                bail!("query failed for {}", plate);
            }
            Ok(self.logged_today.lock().unwrap().contains(plate))
        }

        async fn create_detection(&self, record: &VehicleRecord) -> Result<()> {
            self.logged_today
                .lock()
                .unwrap()
                .insert(record.plate.clone());
            Ok(())
        }
    }

    fn car(plate: &str) -> Detection {
        Detection {
            label: "car".to_string(),
            confidence: 0.9,
            bbox: [0, 0, 10, 10],
            plate: plate.to_string(),
            time: None,
        }
    }

    #[tokio::test]
    async fn test_sync_is_idempotent_within_a_day() {
        let store = MemoryStore::default();
        let detections = vec![
            car("MH-12-AB-1000"),
            car("MH-12-AB-1001"),
            car("MH-12-AB-1002"),
        ];

        let first = sync_detections(&detections, &store).await;
        assert_eq!(first.saved, 3);
        assert!(first.errors.is_empty());

        let second = sync_detections(&detections, &store).await;
        assert_eq!(second.saved, 0);
        assert!(second.errors.is_empty());
    }

    #[tokio::test]
    async fn test_sentinel_plates_never_reach_the_store() {
        let store = MemoryStore::default();
        let mut unplated = car("N/A");
        unplated.label = "person".to_string();
        let detections = vec![unplated, car("")];

        let outcome = sync_detections(&detections, &store).await;
        assert_eq!(outcome.saved, 0);
        assert!(outcome.errors.is_empty());
        assert_eq!(store.queries(), 0);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_batch() {
        let store = MemoryStore::failing(&["MH-12-AB-1000"]);
        let detections = vec![car("MH-12-AB-1000"), car("MH-12-AB-1001")];

        let outcome = sync_detections(&detections, &store).await;
        assert_eq!(outcome.saved, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("MH-12-AB-1000"));
        assert!(store
            .logged_today
            .lock()
            .unwrap()
            .contains("MH-12-AB-1001"));
    }

    #[tokio::test]
    async fn test_duplicate_is_not_an_error() {
        let store = MemoryStore::default();
        store
            .logged_today
            .lock()
            .unwrap()
            .insert("MH-12-AB-1001".to_string());

        let outcome = sync_detections(&[car("MH-12-AB-1001")], &store).await;
        assert_eq!(outcome.saved, 0);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_plate_within_one_batch_saves_once() {
        let store = MemoryStore::default();
        let detections = vec![car("MH-12-AB-1003"), car("MH-12-AB-1003")];

        let outcome = sync_detections(&detections, &store).await;
        assert_eq!(outcome.saved, 1);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_supplied_timestamp_is_forwarded() {
        #[derive(Default)]
        struct CapturingStore {
            records: Mutex<Vec<VehicleRecord>>,
        }

        #[async_trait]
        impl RecordStore for CapturingStore {
            async fn plate_logged_today(&self, _plate: &str) -> Result<bool> {
                Ok(false)
            }

            async fn create_detection(&self, record: &VehicleRecord) -> Result<()> {
                self.records.lock().unwrap().push(record.clone());
                Ok(())
            }
        }

        let store = CapturingStore::default();
        let mut stamped = car("MH-12-AB-1004");
        stamped.time = Some("2026-08-07T10:30:00Z".to_string());
        let detections = vec![stamped, car("MH-12-AB-1005")];

        sync_detections(&detections, &store).await;

        let records = store.records.lock().unwrap();
        assert_eq!(records[0].detection_time, "2026-08-07T10:30:00Z");
        assert_eq!(records[1].detection_time, "Now");
    }
}
