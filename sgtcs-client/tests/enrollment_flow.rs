// Runs the enrollment store against an in-process fake of the certificate API.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use sgtcs_client::{
    CertificateProfile, ClientConfig, ClientError, EnrollmentRequest, EnrollmentState,
    EnrollmentStore, RequestBuilder, RequestConfig, StorageError, StorageLayout, select_profile,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const SSL_ID: u64 = 1757496;

#[derive(Clone, Default)]
struct FakeVendor {
    calls: Arc<AtomicUsize>,
    headers: Arc<Mutex<Vec<(String, String, String)>>>,
    org_ids: Arc<Mutex<Vec<String>>>,
    enrolled: Arc<Mutex<Vec<EnrollmentRequest>>>,
    certificate: Arc<String>,
    fail_enroll: bool,
}

impl FakeVendor {
    fn new() -> Self {
        let certified =
            rcgen::generate_simple_self_signed(vec!["foo.example.org".to_string()]).unwrap();
        Self {
            certificate: Arc::new(certified.cert.pem()),
            ..Self::default()
        }
    }

    fn record(&self, headers: &HeaderMap) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        self.headers
            .lock()
            .unwrap()
            .push((value("customeruri"), value("login"), value("password")));
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn catalog() -> Vec<CertificateProfile> {
    serde_json::from_value(json!([
        {"id": 8575, "name": "01 GÉANT OV Multi-Domain", "description": "max 250 SubjAltNames", "terms": [365]},
        {"id": 8578, "name": "03 GÉANT EV Multi-Domain", "terms": [365]},
        {"id": 8582, "name": "04 GÉANT IGTF Multi-Domain", "description": "grid", "terms": [395]},
        {"id": 15225, "name": "david-test-profile", "terms": [395]}
    ]))
    .unwrap()
}

async fn types(
    State(vendor): State<FakeVendor>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<CertificateProfile>> {
    vendor.record(&headers);
    vendor
        .org_ids
        .lock()
        .unwrap()
        .push(query.get("organizationId").cloned().unwrap_or_default());
    Json(catalog())
}

async fn enroll(
    State(vendor): State<FakeVendor>,
    headers: HeaderMap,
    Json(request): Json<EnrollmentRequest>,
) -> Response {
    vendor.record(&headers);
    if vendor.fail_enroll {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": -7, "description": "Invalid CSR"})),
        )
            .into_response();
    }
    vendor.enrolled.lock().unwrap().push(request);
    Json(json!({"renewId": "SdibUBp-loQxlarC3XWr", "sslId": SSL_ID})).into_response()
}

async fn collect(
    State(vendor): State<FakeVendor>,
    headers: HeaderMap,
    Path((id, format)): Path<(String, String)>,
) -> Response {
    vendor.record(&headers);
    if id != SSL_ID.to_string() || format != "x509CO" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"code": -1, "description": "Unknown sslId"})),
        )
            .into_response();
    }
    vendor.certificate.as_str().to_owned().into_response()
}

async fn spawn_vendor(vendor: FakeVendor) -> String {
    let app = Router::new()
        .route("/api/ssl/v1/types", get(types))
        .route("/api/ssl/v1/enroll", post(enroll))
        .route("/api/ssl/v1/collect/{id}/{format}", get(collect))
        .with_state(vendor);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/", addr)
}

fn client_config(base_url: String) -> ClientConfig {
    ClientConfig::new(base_url)
        .with_customer("surfnet")
        .with_credentials("alice", "s3cret")
        .with_organization_id(11358)
}

#[tokio::test]
async fn test_list_profiles_sends_credentials_and_org() {
    let vendor = FakeVendor::new();
    let base_url = spawn_vendor(vendor.clone()).await;
    let store = EnrollmentStore::new(&client_config(base_url)).unwrap();

    let profiles = store.list_profiles().await.expect("catalog");
    assert_eq!(profiles.len(), 4);
    assert_eq!(profiles[1].description, "");

    assert_eq!(*vendor.org_ids.lock().unwrap(), vec!["11358".to_string()]);
    assert_eq!(
        vendor.headers.lock().unwrap()[0],
        ("surfnet".to_string(), "alice".to_string(), "s3cret".to_string())
    );
}

#[tokio::test]
async fn test_submit_then_retrieve_round_trip() {
    let vendor = FakeVendor::new();
    let base_url = spawn_vendor(vendor.clone()).await;
    let store = EnrollmentStore::new(&client_config(base_url)).unwrap();
    let temp = TempDir::new().unwrap();

    let profiles = store.list_profiles().await.unwrap();
    let profile = select_profile("igtf", &profiles).unwrap();
    assert_eq!(profile.id, 8582);

    let builder = RequestBuilder::new(RequestConfig::new(11358));
    let alts = vec!["bar.example.org".to_string()];
    let layout = StorageLayout::new(temp.path(), "foo.example.org", "2026");
    layout.create().unwrap();

    let key = builder.generate_key().unwrap();
    key.save(layout.key_path()).unwrap();
    let csr = builder.build_csr(&key, "foo.example.org", &alts).unwrap();
    layout.write_csr(csr.pem()).unwrap();
    let payload = builder
        .build_enrollment_payload(&csr, profile, None, "foo.example.org", &alts)
        .unwrap();

    let submission = store.submit(&layout, &payload).await.expect("submit");
    let record = submission.record;
    assert_eq!(record.as_str(), SSL_ID.to_string());
    assert_eq!(submission.renew_id.as_deref(), Some("SdibUBp-loQxlarC3XWr"));
    assert_eq!(layout.state(), EnrollmentState::Submitted);

    {
        let enrolled = vendor.enrolled.lock().unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0], payload);
        assert_eq!(enrolled[0].term, 395);
        assert_eq!(enrolled[0].subj_alt_names, "foo.example.org,bar.example.org");
    }

    // Same id comes back from disk
    assert_eq!(layout.read_tracking_record().unwrap(), record);

    let pem = store.retrieve(&layout).await.expect("retrieve");
    assert_eq!(pem, *vendor.certificate);
    assert_eq!(std::fs::read_to_string(layout.cert_path()).unwrap(), pem);
    assert_eq!(layout.state(), EnrollmentState::Retrieved);
}

#[tokio::test]
async fn test_enroll_failure_reports_status_and_description() {
    let vendor = FakeVendor {
        fail_enroll: true,
        ..FakeVendor::new()
    };
    let base_url = spawn_vendor(vendor.clone()).await;
    let store = EnrollmentStore::new(&client_config(base_url)).unwrap();
    let temp = TempDir::new().unwrap();

    let layout = StorageLayout::new(temp.path(), "foo.example.org", "2026");
    layout.create().unwrap();
    let builder = RequestBuilder::new(RequestConfig::new(11358));
    let key = builder.generate_key().unwrap();
    let csr = builder.build_csr(&key, "foo.example.org", &[]).unwrap();
    let payload = builder
        .build_enrollment_payload(&csr, &catalog()[2], None, "foo.example.org", &[])
        .unwrap();

    match store.submit(&layout, &payload).await {
        Err(ClientError::Service {
            operation,
            status,
            description,
        }) => {
            assert_eq!(operation, "could not submit certificate request");
            assert_eq!(status, 400);
            assert_eq!(description.as_deref(), Some("Invalid CSR"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
    assert!(!layout.request_id_path().exists());
    assert_eq!(layout.state(), EnrollmentState::New);
}

#[tokio::test]
async fn test_retrieve_without_record_fails_before_network() {
    let vendor = FakeVendor::new();
    let base_url = spawn_vendor(vendor.clone()).await;
    let store = EnrollmentStore::new(&client_config(base_url)).unwrap();
    let temp = TempDir::new().unwrap();

    let layout = StorageLayout::new(temp.path(), "foo.example.org", "2026");
    assert!(matches!(
        store.retrieve(&layout).await,
        Err(ClientError::Storage(StorageError::MissingDirectory(_)))
    ));

    layout.create().unwrap();
    assert!(matches!(
        store.retrieve(&layout).await,
        Err(ClientError::Storage(StorageError::MissingTrackingRecord(_)))
    ));
    assert_eq!(vendor.calls(), 0);
}

#[tokio::test]
async fn test_failed_collect_keeps_record() {
    let vendor = FakeVendor::new();
    let base_url = spawn_vendor(vendor.clone()).await;
    let store = EnrollmentStore::new(&client_config(base_url)).unwrap();
    let temp = TempDir::new().unwrap();

    let layout = StorageLayout::new(temp.path(), "foo.example.org", "2026");
    layout.create().unwrap();
    std::fs::write(layout.request_id_path(), "424242\n").unwrap();

    match store.retrieve(&layout).await {
        Err(err @ ClientError::Service { status: 404, .. }) => {
            assert!(err.to_string().starts_with("could not retrieve certificate: 404"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
    assert!(!layout.cert_path().exists());
    assert_eq!(layout.read_tracking_record().unwrap().as_str(), "424242");
}
