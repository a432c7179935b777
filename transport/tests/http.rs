//! Wire-level tests for the HTTP transport against a mock server.

use std::sync::Arc;

use courier_transport::{HttpTransport, OutboundTransport, TransportError, TransportRegistry};
use courier_types::{OutboundMessage, Payload, JSON_CONTENT_TYPE, WIRE_CONTENT_TYPE};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message_to(server: &MockServer, route: &str, payload: impl Into<Payload>) -> OutboundMessage {
    let url = Url::parse(&format!("{}{route}", server.uri())).unwrap();
    OutboundMessage::new(url, payload)
}

#[tokio::test]
async fn raw_payload_posts_wire_content_type_and_verbatim_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/msg"))
        .and(header("content-type", WIRE_CONTENT_TYPE))
        .and(body_bytes(vec![0x01, 0x02, 0x03]))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    transport.activate().await.unwrap();

    let message = message_to(&server, "/msg", vec![0x01, 0x02, 0x03]);
    transport.handle_message(&message).await.unwrap();

    transport.deactivate().await;
}

#[tokio::test]
async fn structured_payload_posts_json_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/msg"))
        .and(header("content-type", JSON_CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    transport.activate().await.unwrap();

    let message = message_to(&server, "/msg", json!({"type": "ping"}));
    transport.handle_message(&message).await.unwrap();

    transport.deactivate().await;
}

#[tokio::test]
async fn non_success_status_is_a_delivery_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/msg"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    transport.activate().await.unwrap();

    let message = message_to(&server, "/msg", vec![0x00]);
    let err = transport.handle_message(&message).await.unwrap_err();
    assert!(matches!(err, TransportError::Delivery(_)));
    assert!(err.is_retryable());

    transport.deactivate().await;
}

#[tokio::test]
async fn connection_failure_is_a_delivery_failure() {
    let transport = HttpTransport::new();
    transport.activate().await.unwrap();

    // Nothing listens on port 1; the connection is refused.
    let url = Url::parse("http://127.0.0.1:1/msg").unwrap();
    let message = OutboundMessage::new(url, vec![0x00]);

    let err = transport.handle_message(&message).await.unwrap_err();
    assert!(matches!(err, TransportError::Delivery(_)));

    transport.deactivate().await;
}

#[tokio::test]
async fn registry_routes_both_http_schemes_to_one_transport() {
    let transport: Arc<dyn OutboundTransport> = Arc::new(HttpTransport::new());
    let (registry, failures) = TransportRegistry::activate([transport]).await.unwrap();
    assert!(failures.is_empty());

    let http = registry.resolve("http").unwrap();
    let https = registry.resolve("https").unwrap();
    assert!(Arc::ptr_eq(&http, &https));

    registry.deactivate_all().await;
}
