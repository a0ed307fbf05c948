//! End-to-end proxy tests against a mock Gemini upstream
//!
//! These tests verify the full request path:
//! - Outbound URL, key parameter and payload shape
//! - Reply extraction and trimming
//! - Upstream error mapping under both policies

use citta::template::{CLOSING_SENTINEL, OPENING_SENTINEL};
use citta::{
    GeminiProvider, ProxyConfig, ProxyRequest, ProxyResponse, ResponseBody, TemplateVersion,
    TextProxy, UpstreamErrorPolicy,
};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const GENERATE_PATH: &str = "/models/gemini-test:generateContent";

fn config(server: &MockServer) -> ProxyConfig {
    ProxyConfig::new(Some("test-key".to_string()))
        .with_api_base(server.uri())
        .with_model(MODEL)
}

fn proxy(config: &ProxyConfig) -> TextProxy<GeminiProvider> {
    TextProxy::new(config, GeminiProvider::new(config)).unwrap()
}

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn post(text: &str) -> ProxyRequest {
    ProxyRequest::post(json!({ "originalText": text }).to_string())
}

// ============ Success Path ============

#[tokio::test]
async fn test_hello_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("  HELLO\n")))
        .expect(1)
        .mount(&server)
        .await;

    let response = proxy(&config(&server)).handle(post("Hello")).await;

    assert_eq!(response, ProxyResponse::formatted("HELLO"));
    assert_eq!(response.to_json(), r#"{"formattedText":"HELLO"}"#);
}

#[tokio::test]
async fn test_outbound_payload_carries_verbatim_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("ok")))
        .mount(&server)
        .await;

    let text = "❤️ Tiêu đề 🌺\n☎️Nam thính giả: \"Chào\" (Được 7 tháng rồi)\n问：你好\t\\";
    proxy(&config(&server)).handle(post(text)).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let payload: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let contents = payload["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0]["role"], "user");

    let prompt = contents[0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains(&format!("{OPENING_SENTINEL}\n{text}\n{CLOSING_SENTINEL}")));
    assert_eq!(
        prompt,
        TemplateVersion::V2.template().unwrap().render(text),
        "default template is v2"
    );
}

#[tokio::test]
async fn test_v1_template_selected_by_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("ok")))
        .mount(&server)
        .await;

    let config = config(&server).with_template(TemplateVersion::V1);
    proxy(&config).handle(post("abc")).await;

    let requests = server.received_requests().await.unwrap();
    let payload: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = payload["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("hai lần xuống dòng"));
}

#[tokio::test]
async fn test_identical_requests_are_not_deduplicated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("same")))
        .expect(2)
        .mount(&server)
        .await;

    let proxy = proxy(&config(&server));
    let (a, b) = tokio::join!(proxy.handle(post("x")), proxy.handle(post("x")));
    assert_eq!(a, b);
}

// ============ Failure Paths ============

#[tokio::test]
async fn test_missing_key_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("x")))
        .expect(0)
        .mount(&server)
        .await;

    let config = config(&server).with_api_key(None);
    let response = proxy(&config).handle(post("Hello")).await;

    assert_eq!(response.status, 500);
    assert!(response.to_json().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_upstream_error_propagates_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({ "error": { "message": "Resource has been exhausted" } })),
        )
        .mount(&server)
        .await;

    let response = proxy(&config(&server)).handle(post("Hello")).await;

    assert_eq!(response.status, 429);
    assert_eq!(response.to_json(), r#"{"error":"API Error: Too Many Requests"}"#);
}

#[tokio::test]
async fn test_upstream_error_collapses_to_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let config = config(&server).with_upstream_error_policy(UpstreamErrorPolicy::Collapse);
    let response = proxy(&config).handle(post("Hello")).await;

    assert_eq!(response.status, 500);
    match response.body {
        ResponseBody::Error(body) => {
            assert_eq!(body.error, "API Error: Bad Request");
            assert!(!body.error.contains("API key not valid"));
        }
        ResponseBody::Formatted(_) => panic!("expected error envelope"),
    }
}

#[tokio::test]
async fn test_unexpected_shape_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
        )
        .mount(&server)
        .await;

    let response = proxy(&config(&server)).handle(post("Hello")).await;

    assert_eq!(response.status, 500);
    assert!(!response.to_json().contains("formattedText"));
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    let config = ProxyConfig::new(Some("test-key".to_string()))
        .with_api_base("http://127.0.0.1:1")
        .with_model(MODEL);

    let response = proxy(&config).handle(post("Hello")).await;
    assert_eq!(response.status, 500);
    assert!(response.to_json().contains("Network error"));
    assert!(!response.to_json().contains("test-key"));
}

#[tokio::test]
async fn test_array_body_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("OK")))
        .expect(0)
        .mount(&server)
        .await;

    let response = proxy(&config(&server))
        .handle(ProxyRequest::post(r#"["Hello"]"#))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(response.to_json(), r#"{"error":"originalText is required."}"#);
}
