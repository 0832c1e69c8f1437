// Integration tests for `EagleClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eagle_api::{EagleClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, EagleClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = EagleClient::new(base, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_text_cleans_html_wrapped_body() {
    let (server, client) = setup().await;

    let body = "<!-- eagle web server -->\r\n  {\"result\":\"OK\",\r\n  \"ecco\":\"Idle\"}\r\n";
    Mock::given(method("GET"))
        .and(path("/getecco"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let text = client.get_text("/getecco").await.unwrap();
    assert_eq!(text, "{\"result\":\"OK\",\"ecco\":\"Idle\"}");
}

#[tokio::test]
async fn test_get_ecco_connected() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getecco"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "OK",
            "ecco": "Connected",
            "temp": 21.5,
            "hum": 47,
            "pressure": 1013.2,
            "dew": 9.8
        })))
        .mount(&server)
        .await;

    let resp = client.get_ecco().await.unwrap();
    assert!(resp.is_ok());
    assert!(resp.is_sensor_connected());

    let values = resp.values().unwrap();
    assert!((values.temperature - 21.5).abs() < f64::EPSILON);
    assert!((values.dew_point - 9.8).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_get_info_firmware() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getinfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": "OK", "firmwareversion": "2.4.1" })),
        )
        .mount(&server)
        .await;

    let info = client.get_info().await.unwrap();
    assert_eq!(info.firmware_version.as_deref(), Some("2.4.1"));
}

#[tokio::test]
async fn test_connect_ecco_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/connectecco"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>starting</html>"))
        .expect(1)
        .mount(&server)
        .await;

    client.connect_ecco().await.unwrap();
}

#[tokio::test]
async fn test_empty_body_reads_as_empty_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getecco"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert_eq!(client.get_text("/getecco").await.unwrap(), "");
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_status_is_transport_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getecco"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.get_ecco().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert_eq!(err.status(), Some(500));
    assert!(!err.is_connect_failure());
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getecco"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_ecco().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refused_connection_is_connect_failure() {
    // Bind then drop a listener so the port is known to be closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let client = EagleClient::new(base, &TransportConfig::default()).unwrap();

    let err = client.get_text("/getinfo").await.unwrap_err();
    assert!(err.is_connect_failure(), "got {err:?}");
}
