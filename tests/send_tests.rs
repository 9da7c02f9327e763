//! Integration tests for sending messages against a mock Mailgun server.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mailgun_client::observability::HttpLogger;
use mailgun_client::transport::{HttpRequest, HttpResponse, TransportError};
use mailgun_client::{Acknowledgment, MailgunClient, MailgunError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOMAIN: &str = "mg.example.com";
const API_KEY: &str = "key-3ax6xnjp29jd6fds4gc373sgvjxteol0";

fn basic_auth() -> String {
    format!("Basic {}", STANDARD.encode(format!("api:{}", API_KEY)))
}

fn client_for(server: &MockServer) -> MailgunClient {
    MailgunClient::builder()
        .domain(DOMAIN)
        .api_key(API_KEY)
        .base_url(server.uri())
        .build()
        .expect("Failed to build client")
}

/// Logger collecting formatted lines.
#[derive(Default)]
struct LineLogger {
    lines: Mutex<Vec<String>>,
}

impl LineLogger {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl HttpLogger for LineLogger {
    fn log_request(&self, request: &HttpRequest) {
        self.lines
            .lock()
            .unwrap()
            .push(mailgun_client::observability::request_line(request));
    }

    fn log_response(
        &self,
        request: &HttpRequest,
        outcome: Result<&HttpResponse, &TransportError>,
        duration: Duration,
    ) {
        self.lines
            .lock()
            .unwrap()
            .push(mailgun_client::observability::response_line(
                request, outcome, duration,
            ));
    }
}

#[tokio::test]
async fn test_send_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mg.example.com/messages"))
        .and(header("authorization", basic_auth().as_str()))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "message": "Queued. Thank you."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.create(
        "jane@example.com",
        "John <john@mg.example.com>",
        "Hey",
        "Body",
    );

    let ack = client.send().await.unwrap();

    assert_eq!(
        ack,
        Acknowledgment {
            id: "abc".to_string(),
            message: "Queued. Thank you.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_form_body_round_trips() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x", "message": "ok"})))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.create(
        "a+b@example.com, c@example.com",
        "Sales & Support <help@mg.example.com>",
        "100% = ünïcode?",
        "line one\r\nline two &amp; more",
    );
    client.send().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let fields: Vec<(String, String)> = url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect();
    assert_eq!(
        fields,
        vec![
            ("to".to_string(), "a+b@example.com, c@example.com".to_string()),
            (
                "from".to_string(),
                "Sales & Support <help@mg.example.com>".to_string()
            ),
            ("subject".to_string(), "100% = ünïcode?".to_string()),
            (
                "text".to_string(),
                "line one\r\nline two &amp; more".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_unauthorized_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mg.example.com/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Forbidden"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.send().await.unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert!(err.to_string().contains("Forbidden"));
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Queued. Thank you."))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.send().await.unwrap_err();

    assert!(matches!(err, MailgunError::Parse { .. }));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mg.example.com/messages"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/elsewhere", mock_server.uri()).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x", "message": "ok"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.send().await.unwrap_err();

    assert_eq!(err.status_code(), Some(302));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "x", "message": "ok"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = MailgunClient::builder()
        .domain(DOMAIN)
        .api_key(API_KEY)
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.send().await.unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(err, MailgunError::Network { .. }));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = MailgunClient::builder()
        .domain(DOMAIN)
        .api_key(API_KEY)
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = client.send().await.unwrap_err();

    assert!(matches!(err, MailgunError::Network { .. }));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_debug_client_logs_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "message": "Queued. Thank you."
        })))
        .mount(&mock_server)
        .await;

    let logger = Arc::new(LineLogger::default());
    let client = MailgunClient::builder()
        .domain(DOMAIN)
        .api_key(API_KEY)
        .base_url(mock_server.uri())
        .debug(true)
        .logger(logger.clone())
        .dump_sink(Box::new(std::io::sink()))
        .build()
        .unwrap();

    client.send().await.unwrap();

    let url = format!("{}/v3/mg.example.com/messages", mock_server.uri());
    let lines = logger.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("▶ POST {}", url));
    assert!(lines[1].starts_with("◀ method=POST status=200 durationMs="));
    assert!(lines[1].ends_with(&format!("{}, ", url)));
}

#[tokio::test]
async fn test_debug_client_logs_failures() {
    let logger = Arc::new(LineLogger::default());
    let client = MailgunClient::builder()
        .domain(DOMAIN)
        .api_key(API_KEY)
        .base_url("http://127.0.0.1:1")
        .debug(true)
        .logger(logger.clone())
        .dump_sink(Box::new(std::io::sink()))
        .build()
        .unwrap();

    let err = client.send().await.unwrap_err();

    let lines = logger.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("Connection error"));
    assert!(err.to_string().contains(&lines[1]));
}
