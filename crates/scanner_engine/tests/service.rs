use std::time::Duration;

use pretty_assertions::assert_eq;
use scanner_engine::{
    FailureKind, ReqwestScanService, ScanRequest, ScanService, ServiceSettings, SiteSummary,
};
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> ReqwestScanService {
    let base = Url::parse(&server.uri()).unwrap();
    ReqwestScanService::new(ServiceSettings::new(base)).unwrap()
}

#[tokio::test]
async fn scan_posts_urls_and_decodes_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "urls": ["a.com", "b.com"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "base_url": "https://a.com",
                "pages_crawled": 12,
                "error_pages": 1,
                "pdf_count": 3,
                "count_accessible": 1,
                "count_likely": 1,
                "count_inaccessible": 1,
                "output_dir": "/srv/out",
                "report_path": "/scan_results/a/report.xlsx"
            }],
            "zip_file": "/download/pdf_reports_20240101_000000.zip"
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let reply = service
        .scan(&ScanRequest {
            urls: vec!["a.com".to_string(), "b.com".to_string()],
        })
        .await
        .expect("scan ok");

    assert_eq!(reply.status, None);
    assert_eq!(
        reply.zip_file.as_deref(),
        Some("/download/pdf_reports_20240101_000000.zip")
    );
    assert_eq!(
        reply.results,
        vec![SiteSummary {
            base_url: "https://a.com".to_string(),
            pages_crawled: 12,
            pdf_count: 3,
            count_accessible: 1,
            count_likely: 1,
            count_inaccessible: 1,
            error_pages: Some(1),
            report_path: Some("/scan_results/a/report.xlsx".to_string()),
        }]
    );
}

#[tokio::test]
async fn stopped_reply_decodes_without_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "stopped" })),
        )
        .mount(&server)
        .await;

    let reply = service_for(&server)
        .scan(&ScanRequest {
            urls: vec!["a.com".to_string()],
        })
        .await
        .expect("scan ok");

    assert_eq!(reply.status.as_deref(), Some("stopped"));
    assert!(reply.results.is_empty());
    assert_eq!(reply.zip_file, None);
}

#[tokio::test]
async fn scan_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": "No URLs provided" })),
        )
        .mount(&server)
        .await;

    let err = service_for(&server)
        .scan(&ScanRequest { urls: Vec::new() })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
}

#[tokio::test]
async fn scan_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .scan(&ScanRequest {
            urls: vec!["a.com".to_string()],
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Json);
}

#[tokio::test]
async fn scan_times_out_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "results": [] })),
        )
        .mount(&server)
        .await;

    let settings = ServiceSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..ServiceSettings::new(Url::parse(&server.uri()).unwrap())
    };
    let service = ReqwestScanService::new(settings).unwrap();

    let err = service
        .scan(&ScanRequest {
            urls: vec!["a.com".to_string()],
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn stop_ignores_reply_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stop"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    service_for(&server).stop().await.expect("stop delivered");
}

#[tokio::test]
async fn stop_reports_unreachable_service() {
    // Port 1 is reserved and refuses connections.
    let base = Url::parse("http://127.0.0.1:1").unwrap();
    let service = ReqwestScanService::new(ServiceSettings::new(base)).unwrap();

    let err = service.stop().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn endpoints_resolve_under_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pdf/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/pdf", server.uri())).unwrap();
    let service = ReqwestScanService::new(ServiceSettings::new(base)).unwrap();

    let reply = service
        .scan(&ScanRequest {
            urls: vec!["a.com".to_string()],
        })
        .await
        .expect("scan ok");
    assert!(reply.results.is_empty());
    assert_eq!(
        service.resolve("/download/x.zip").unwrap().as_str(),
        format!("{}/download/x.zip", server.uri())
    );
    assert_eq!(
        service.resolve("https://cdn.example/x.zip").unwrap().as_str(),
        "https://cdn.example/x.zip"
    );
}

#[tokio::test]
async fn download_returns_archive_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/x.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04zip".to_vec()))
        .mount(&server)
        .await;

    let bytes = service_for(&server)
        .download("/download/x.zip")
        .await
        .expect("download ok");
    assert_eq!(&bytes[..], b"PK\x03\x04zip");
}

#[tokio::test]
async fn download_rejects_too_large_archive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/big.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 11]))
        .mount(&server)
        .await;

    let settings = ServiceSettings {
        max_download_bytes: 10,
        ..ServiceSettings::new(Url::parse(&server.uri()).unwrap())
    };
    let service = ReqwestScanService::new(settings).unwrap();

    let err = service.download("/download/big.zip").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
