//! HTTP 后端测试 (wiremock)

use krishi_ai::infrastructure::config::{GeminiConfig, OpenAiConfig, WeatherConfig};
use krishi_ai::infrastructure::network::gemini::GeminiBackend;
use krishi_ai::infrastructure::network::http::create_client;
use krishi_ai::infrastructure::network::openai::OpenAiBackend;
use krishi_ai::infrastructure::network::weather::WeatherClient;
use krishi_ai::{Backend, BackendError, KrishiError, ProviderKind};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini(server: &MockServer, api_key: Option<&str>) -> GeminiBackend {
    let config = GeminiConfig {
        api_key: api_key.map(str::to_string),
        base_url: server.uri(),
        ..GeminiConfig::default()
    };
    GeminiBackend::new(create_client().unwrap(), &config)
}

fn openai(server: &MockServer) -> OpenAiBackend {
    let config = OpenAiConfig {
        api_key: Some("sk-test".to_string()),
        base_url: format!("{}/v1", server.uri()),
        ..OpenAiConfig::default()
    };
    OpenAiBackend::new(create_client().unwrap(), &config)
}

#[tokio::test]
async fn test_gemini_generate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "the prompt" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Sow wheat " }, { "text": "in November.\n" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = gemini(&server, Some("g-key"));

    assert_eq!(backend.kind(), ProviderKind::Gemini);
    assert!(backend.is_available());
    let text = backend.generate("the prompt").await.unwrap();
    assert_eq!(text, "Sow wheat in November.");
}

#[tokio::test]
async fn test_gemini_without_key_is_unavailable() {
    let server = MockServer::start().await;
    let backend = gemini(&server, Some("   "));

    assert!(!backend.is_available());
    assert!(matches!(
        backend.generate("prompt").await,
        Err(BackendError::Unavailable)
    ));
}

#[tokio::test]
async fn test_gemini_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = gemini(&server, Some("g-key"))
        .generate("prompt")
        .await
        .unwrap_err();

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_gemini_without_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let result = gemini(&server, Some("g-key")).generate("prompt").await;
    assert!(matches!(result, Err(BackendError::Parse(_))));
}

#[tokio::test]
async fn test_openai_generate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Use pheromone traps. " } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = openai(&server);

    assert_eq!(backend.kind(), ProviderKind::OpenAi);
    assert_eq!(
        backend.generate("prompt").await.unwrap(),
        "Use pheromone traps."
    );
}

#[tokio::test]
async fn test_openai_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = openai(&server).generate("prompt").await;
    assert!(matches!(result, Err(BackendError::Parse(_))));
}

fn weather_client(server: &MockServer, api_key: Option<&str>) -> WeatherClient {
    let config = WeatherConfig {
        api_key: api_key.map(str::to_string),
        base_url: server.uri(),
    };
    WeatherClient::new(create_client().unwrap(), &config)
}

#[tokio::test]
async fn test_current_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("appid", "owm"))
        .and(query_param("units", "metric"))
        .and(query_param("lat", "12.97"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": { "temp": 31.5, "humidity": 85 },
            "weather": [{ "main": "Rain", "description": "light rain" }],
            "wind": { "speed": 4.1 }
        })))
        .mount(&server)
        .await;

    let snapshot = weather_client(&server, Some("owm"))
        .current(12.97, 77.59)
        .await
        .unwrap();

    assert_eq!(snapshot.temperature, 31.5);
    assert_eq!(snapshot.humidity, 85.0);
    assert_eq!(snapshot.condition, "Rain");
    assert_eq!(snapshot.description, "light rain");
    assert_eq!(snapshot.wind_speed, 4.1);
}

#[tokio::test]
async fn test_forecast_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [
                {
                    "dt_txt": "2024-07-01 12:00:00",
                    "main": { "temp": 30.0, "temp_min": 28.0, "temp_max": 32.0, "humidity": 70 },
                    "weather": [{ "main": "Rain", "description": "moderate rain" }],
                    "rain": { "3h": 2.5 }
                },
                {
                    "dt_txt": "2024-07-01 15:00:00",
                    "main": { "temp": 29.0, "temp_min": 27.0, "temp_max": 31.0, "humidity": 75 },
                    "weather": [{ "main": "Clouds", "description": "overcast" }]
                }
            ]
        })))
        .mount(&server)
        .await;

    let entries = weather_client(&server, Some("owm"))
        .forecast(12.97, 77.59)
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].rain_3h, 2.5);
    assert_eq!(entries[1].rain_3h, 0.0);
    assert_eq!(entries[1].condition, "Clouds");
}

#[tokio::test]
async fn test_weather_requires_key() {
    let server = MockServer::start().await;
    let result = weather_client(&server, None).current(0.0, 0.0).await;
    assert!(matches!(result, Err(KrishiError::Config(_))));
}

#[tokio::test]
async fn test_weather_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = weather_client(&server, Some("bad")).current(0.0, 0.0).await;
    assert!(matches!(result, Err(KrishiError::Api(_))));
}

#[test]
fn test_blank_weather_key_is_not_configured() {
    let config = |key: Option<&str>| WeatherConfig {
        api_key: key.map(str::to_string),
        base_url: "http://localhost".to_string(),
    };
    let client = |key| WeatherClient::new(create_client().unwrap(), &config(key));

    assert!(!client(None).is_configured());
    assert!(!client(Some("  ")).is_configured());
    assert!(client(Some("owm")).is_configured());
}
