//! HTTP producer adapter against a mock server

use ecoguard_triage::{
    HttpReportSource, ProducerConfig, ReportRepository, ReportSource, TransportError,
    TriageError,
};
use ecoguard_types::{Category, ReportId, ReportStatus};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> HttpReportSource {
    let config = ProducerConfig {
        base_url: server.uri(),
        request_timeout_secs: 2,
        ..ProducerConfig::default()
    };
    HttpReportSource::new(&config).unwrap()
}

#[tokio::test]
async fn fetches_and_admits_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "reports": [
                {
                    "id": 12,
                    "category": "landfill",
                    "score": 0.72,
                    "status": "Illegal Dumping",
                    "lat": 12.9716,
                    "lng": 77.5946,
                    "timestamp": "2024-03-02 08:00:01.250000",
                    "image_path": "/uploads/reports/landfill_12.png"
                },
                {
                    "id": "11",
                    "category": "deforestation",
                    "score": 0.18,
                    "status": "Medium",
                    "lat": null,
                    "lng": null,
                    "timestamp": "2024-03-01T09:00:00Z",
                    "image_path": ""
                }
            ]
        })))
        .mount(&server)
        .await;

    let batch = source_for(&server).fetch_reports().await.unwrap();
    assert!(batch.rejected.is_empty());
    assert_eq!(batch.reports.len(), 2);

    let first = &batch.reports[0];
    assert_eq!(first.id, ReportId::from(12));
    assert_eq!(first.category, Category::Landfill);
    assert_eq!(first.status, ReportStatus::IllegalDumping);
    assert!(first.has_evidence());

    let second = &batch.reports[1];
    assert_eq!(second.id, ReportId::from("11"));
    assert!(second.location.is_none());
    assert!(second.image_path.is_none());
}

#[tokio::test]
async fn producer_declared_failure_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "database is locked" })),
        )
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_reports().await.unwrap_err();
    assert!(matches!(
        err,
        TriageError::Transport(TransportError::Rejected(reason)) if reason == "database is locked"
    ));
}

#[tokio::test]
async fn malformed_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_reports().await.unwrap_err();
    assert!(matches!(
        err,
        TriageError::Transport(TransportError::Malformed(_))
    ));
}

#[tokio::test]
async fn server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_reports().await.unwrap_err();
    assert!(matches!(
        err,
        TriageError::Transport(TransportError::Api { status: 500, ref message }) if message == "boom"
    ));
}

#[tokio::test]
async fn delete_confirms_and_maps_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/reports/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/reports/6"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/reports/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let source = source_for(&server);
    source.delete_report(&ReportId::from(5)).await.unwrap();
    source.delete_report(&ReportId::from(7)).await.unwrap();
    assert!(matches!(
        source.delete_report(&ReportId::from(6)).await,
        Err(TriageError::NotFound(id)) if id == ReportId::from(6)
    ));
}

#[tokio::test]
async fn delete_refused_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/reports/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "report is locked" })),
        )
        .mount(&server)
        .await;

    let err = source_for(&server)
        .delete_report(&ReportId::from(5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TriageError::Transport(TransportError::Rejected(_))
    ));
}

#[tokio::test]
async fn slow_producer_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "reports": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_reports().await.unwrap_err();
    assert!(matches!(
        err,
        TriageError::Transport(TransportError::Timeout(d)) if d == Duration::from_secs(2)
    ));
}

#[tokio::test]
async fn health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy", "device": "cuda" })),
        )
        .mount(&server)
        .await;

    let health = source_for(&server).health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.device.as_deref(), Some("cuda"));
}

#[tokio::test]
async fn delete_sends_id_as_a_single_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/reports/6"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/reports/5%2F..%2F6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server);
    source.delete_report(&ReportId::from("5/../6")).await.unwrap();
    assert!(matches!(
        source.delete_report(&ReportId::from("6?x=1")).await,
        Err(TriageError::NotFound(_))
    ));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.url.query(), None);
        assert_ne!(request.url.path(), "/api/reports/6");
        assert_eq!(request.url.path_segments().map(|s| s.count()), Some(3));
    }
}

#[tokio::test]
async fn delete_accepts_any_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/reports/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reports": [{
                "id": 5,
                "category": "landfill",
                "score": 0.5,
                "status": "Suspicious Site",
                "timestamp": "2024-03-02 08:00:01"
            }]
        })))
        .mount(&server)
        .await;

    let repository = ReportRepository::new(Arc::new(source_for(&server)), Duration::from_secs(2));
    repository.load_all().await.unwrap();
    repository.delete_by_id(&ReportId::from(5)).await.unwrap();
    assert!(repository.reports().await.is_empty());
}
