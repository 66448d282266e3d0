//! HTTP-level tests for the Gemini backend using wiremock.
//!
//! These verify status-code classification, envelope decoding and the
//! end-to-end pipeline against a mock generateContent endpoint.

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_core::{
    ForecastHorizon, GeminiBackend, QueryError, TextModel, WeatherQueryService, WeatherRequest,
};

const TEST_MODEL: &str = "gemini-2.5-flash";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_backend(server: &MockServer) -> GeminiBackend {
    GeminiBackend::new("test-key".to_string(), TEST_MODEL.to_string(), server.uri())
        .expect("backend construction should succeed")
}

/// Wrap model text in a generateContent response envelope.
fn envelope(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {
                    "parts": [ { "text": text } ],
                    "role": "model"
                },
                "finishReason": "STOP"
            }
        ]
    })
}

fn weather_payload() -> Value {
    let hourly: Vec<Value> = (0..24)
        .map(|h| json!({ "time": format!("{h:02}:00"), "temp": 14.0, "condition": "Clear" }))
        .collect();
    let daily: Vec<Value> = (0..5)
        .map(|d| json!({ "day": format!("Day {d}"), "condition": "Rain", "low": 9, "high": 16 }))
        .collect();

    json!({
        "location": "Oslo, Norway",
        "date": "Friday, August 28, 2026",
        "current": {
            "temp": 14.0,
            "condition": "Light Rain",
            "wind": { "speed": 20.0, "direction": "SW" },
            "humidity": 80,
            "pressure": 1002,
            "visibility": 8,
            "uvIndex": { "value": 2, "description": "Low" }
        },
        "hourly": hourly,
        "daily": daily
    })
}

#[tokio::test]
async fn success_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("hello from the model")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = test_backend(&server);
    let text = backend.generate("say hello").await.unwrap();

    assert_eq!(text, "hello from the model");
}

#[tokio::test]
async fn unauthorized_is_a_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "API key not valid" } })),
        )
        .mount(&server)
        .await;

    let err = test_backend(&server).generate("anything").await.unwrap_err();

    assert!(matches!(err, QueryError::Credential(_)));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn forbidden_is_a_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = test_backend(&server).generate("anything").await.unwrap_err();

    assert!(matches!(err, QueryError::Credential(_)));
}

#[tokio::test]
async fn server_error_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = test_backend(&server).generate("anything").await.unwrap_err();

    assert!(matches!(err, QueryError::Network(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    // Port 9 (discard) is not listening.
    let backend = GeminiBackend::new(
        "test-key".to_string(),
        TEST_MODEL.to_string(),
        "http://127.0.0.1:9".to_string(),
    )
    .unwrap();

    let err = backend.generate("anything").await.unwrap_err();

    assert!(matches!(err, QueryError::Network(_)));
}

#[tokio::test]
async fn non_json_body_is_a_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not an envelope"))
        .mount(&server)
        .await;

    let err = test_backend(&server).generate("anything").await.unwrap_err();

    assert!(matches!(err, QueryError::Format(_)));
}

#[tokio::test]
async fn empty_candidate_list_is_a_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = test_backend(&server).generate("anything").await.unwrap_err();

    assert!(matches!(err, QueryError::Format(_)));
}

#[tokio::test]
async fn end_to_end_snapshot_through_the_backend() {
    let fenced = format!("```json\n{}\n```", weather_payload());
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&fenced)))
        .mount(&server)
        .await;

    let service = WeatherQueryService::new(std::sync::Arc::new(test_backend(&server)));
    let request = WeatherRequest::new("Oslo, Norway", ForecastHorizon::FiveDays);

    let snapshot = service.fetch_weather(&request, None).await.unwrap();

    assert_eq!(snapshot.location, "Oslo, Norway");
    assert_eq!(snapshot.daily.len(), 5);
    assert_eq!(snapshot.current.wind.gust, None);
}
