/// Wire-level tests for the record store REST client against a local stub
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use common::detections::Detection;
use common::records::RecordStore;
use detection_service::config::SalesforceConfig;
use detection_service::store::RestRecordStore;
use detection_service::sync::sync_detections;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Stub {
    queries: Vec<HashMap<String, String>>,
    security_tokens: Vec<String>,
    created: Vec<Value>,
    logged: HashSet<String>,
}

type StubState = Arc<Mutex<Stub>>;

async fn query(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut stub = state.lock().unwrap();
    if let Some(token) = headers.get("X-Security-Token") {
        stub.security_tokens
            .push(token.to_str().unwrap_or_default().to_string());
    }
    let plate = params.get("plate").cloned().unwrap_or_default();
    let total = u32::from(stub.logged.contains(&plate));
    stub.queries.push(params);
    Json(json!({ "total_size": total }))
}

async fn create(State(state): State<StubState>, Json(record): Json<Value>) -> Json<Value> {
    let mut stub = state.lock().unwrap();
    if let Some(plate) = record.get("License_Plate__c").and_then(|v| v.as_str()) {
        stub.logged.insert(plate.to_string());
    }
    stub.created.push(record);
    Json(json!({ "success": true }))
}

async fn spawn_stub() -> (StubState, RestRecordStore) {
    let state: StubState = Arc::default();
    let app = Router::new()
        .route(
            "/services/records/Vehicle_Detection__c",
            get(query).post(create),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = SalesforceConfig {
        username: "ops@example.com".to_string(),
        password: "hunter2".to_string(),
        security_token: "token-123".to_string(),
        domain: "test".to_string(),
    };
    let store = RestRecordStore::with_base_url(&config, format!("http://{}", addr)).unwrap();

    (state, store)
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
async fn test_query_binds_plate_as_parameter() {
    let (state, store) = spawn_stub().await;

    // a plate needing URL escaping must round-trip untouched
    let plate = "MH-12 AB&1001";
    let seen = store.plate_logged_today(plate).await.unwrap();
    assert!(!seen);

    let stub = state.lock().unwrap();
    let params = &stub.queries[0];
    assert_eq!(params.get("plate").map(String::as_str), Some(plate));
    assert_eq!(params.get("created").map(String::as_str), Some("today"));
    assert_eq!(params.get("limit").map(String::as_str), Some("1"));
    assert_eq!(stub.security_tokens[0], "token-123");
}

#[tokio::test]
async fn test_create_uses_store_field_names() {
    let (state, store) = spawn_stub().await;

    let outcome = sync_detections(&[car("MH-12-AB-1005")], &store).await;
    assert_eq!(outcome.saved, 1);
    assert!(outcome.errors.is_empty());

    let stub = state.lock().unwrap();
    let record = &stub.created[0];
    assert_eq!(record["License_Plate__c"], "MH-12-AB-1005");
    assert_eq!(record["Vehicle_Type__c"], "car");
    assert_eq!(record["Detection_Time__c"], "Now");
}

#[tokio::test]
async fn test_sync_over_rest_is_idempotent() {
    let (state, store) = spawn_stub().await;
    let detections = vec![car("MH-12-AB-1000"), car("MH-12-AB-1002")];

    let first = sync_detections(&detections, &store).await;
    assert_eq!(first.saved, 2);

    let second = sync_detections(&detections, &store).await;
    assert_eq!(second.saved, 0);
    assert!(second.errors.is_empty());

    let stub = state.lock().unwrap();
    assert_eq!(stub.created.len(), 2);
}
