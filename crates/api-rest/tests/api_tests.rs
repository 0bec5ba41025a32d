use api_rest::{create_app, AppState};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use chrono::{DateTime, Duration, TimeZone, Utc};
use patient_core::{Clock, CoreConfig, IdPolicy, PatientStore};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

fn test_app(policy: IdPolicy) -> Router {
    let store = Arc::new(PatientStore::new(CoreConfig::new(policy)));
    create_app(AppState::new(store))
}

/// Advances one second on every read so successive stamps always differ.
struct SteppingClock {
    base: DateTime<Utc>,
    ticks: AtomicI64,
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}

fn stepping_app() -> Router {
    let clock = SteppingClock {
        base: Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid instant"),
        ticks: AtomicI64::new(0),
    };
    let store = Arc::new(PatientStore::with_clock(
        CoreConfig::new(IdPolicy::Count),
        Arc::new(clock),
    ));
    create_app(AppState::new(store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn total_patients(app: &Router) -> u64 {
    let (_, health) = send(app, Method::GET, "/health", None).await;
    health["total_patients"].as_u64().unwrap()
}

#[tokio::test]
async fn test_end_to_end_patient_lifecycle() {
    let app = stepping_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(r#"{"name":"Alice","requestId":"r1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Patient data added successfully");
    let record = &created["data"];
    assert_eq!(record["id"], 1);
    assert!(record["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(record["lastUpdate"].as_str().unwrap().ends_with('Z'));

    let (status, by_request) = send(&app, Method::GET, "/api/patients/request/r1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&by_request, record);

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/patients/1",
        Some(r#"{"name":"Alicia"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Patient data updated successfully");
    assert_eq!(updated["data"]["name"], "Alicia");
    assert_eq!(updated["data"]["requestId"], "r1");
    assert_eq!(updated["data"]["createdAt"], record["createdAt"]);
    assert!(updated["data"]["lastUpdate"].as_str() > record["lastUpdate"].as_str());

    let (status, deleted) = send(&app, Method::DELETE, "/api/patients/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Patient data deleted successfully");
    assert_eq!(deleted["data"], updated["data"]);

    let (status, missing) = send(&app, Method::GET, "/api/patients/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing, json!({"error": "Patient not found"}));
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = test_app(IdPolicy::Count);

    for body in ["{not json", "[1,2,3]", "null", ""] {
        let (status, error) = send(&app, Method::POST, "/api/patients", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(error["error"], "Invalid data format");
        assert!(error["details"].as_str().is_some_and(|d| !d.is_empty()));
    }

    assert_eq!(total_patients(&app).await, 0);
}

#[tokio::test]
async fn test_create_keeps_client_supplied_fields() {
    let app = test_app(IdPolicy::Count);
    let body = json!({
        "id": 77,
        "createdAt": "2024-05-01T10:00:00Z",
        "lastUpdate": "2024-05-02T10:00:00Z",
        "diagnosis": {"code": "J45"}
    });

    let (status, created) =
        send(&app, Method::POST, "/api/patients", Some(&body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"], body);

    let (status, fetched) = send(&app, Method::GET, "/api/patients/77", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_list_returns_insertion_order() {
    let app = test_app(IdPolicy::Count);

    let (status, empty) = send(&app, Method::GET, "/api/patients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));

    for name in ["a", "b", "c"] {
        let body = json!({ "name": name }).to_string();
        send(&app, Method::POST, "/api/patients", Some(&body)).await;
    }

    let (_, listed) = send(&app, Method::GET, "/api/patients", None).await;
    let names: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_request_id_lookup_miss() {
    let app = test_app(IdPolicy::Count);
    send(&app, Method::POST, "/api/patients", Some(r#"{"name":"x"}"#)).await;

    let (status, error) = send(&app, Method::GET, "/api/patients/request/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Patient not found");
}

#[tokio::test]
async fn test_update_errors() {
    let app = test_app(IdPolicy::Count);
    send(&app, Method::POST, "/api/patients", Some(r#"{"name":"Alice"}"#)).await;

    let (status, error) = send(&app, Method::PUT, "/api/patients/5", Some("garbage")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Patient not found");

    let (status, error) = send(&app, Method::PUT, "/api/patients/1", Some("[\"x\"]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Update failed");
    assert!(error["details"].is_string());

    let (_, unchanged) = send(&app, Method::GET, "/api/patients/1", None).await;
    assert_eq!(unchanged["name"], "Alice");
}

#[tokio::test]
async fn test_delete_missing_leaves_store_unchanged() {
    let app = test_app(IdPolicy::Count);
    send(&app, Method::POST, "/api/patients", Some("{}")).await;

    let (status, error) = send(&app, Method::DELETE, "/api/patients/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Patient not found");
    assert_eq!(total_patients(&app).await, 1);
}

#[tokio::test]
async fn test_non_integer_id_is_unknown_route() {
    let app = test_app(IdPolicy::Count);
    send(&app, Method::POST, "/api/patients", Some("{}")).await;

    for uri in ["/api/patients/abc", "/api/patients/-1", "/api/patients/1.0"] {
        let (status, error) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(error["error"], "Not found");
    }

    let (status, _) = send(&app, Method::GET, "/no/such/route", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_count() {
    let app = test_app(IdPolicy::Count);
    send(&app, Method::POST, "/api/patients", Some("{}")).await;
    send(&app, Method::POST, "/api/patients", Some("{}")).await;

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["total_patients"], 2);
    assert!(health["timestamp"].is_string());
}

#[tokio::test]
async fn test_id_policies_after_delete() {
    for (policy, expected) in [(IdPolicy::Count, 3), (IdPolicy::Monotonic, 4)] {
        let app = test_app(policy);
        for _ in 0..3 {
            send(&app, Method::POST, "/api/patients", Some("{}")).await;
        }
        send(&app, Method::DELETE, "/api/patients/2", None).await;

        let (_, created) = send(&app, Method::POST, "/api/patients", Some("{}")).await;
        assert_eq!(created["data"]["id"], expected, "{policy}");
    }
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app(IdPolicy::Count);

    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/patients/{id}").is_some());
    assert!(doc["paths"].get("/health").is_some());
}
