//! API handlers

use axum::{
    Json,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use weather_core::{WeatherError, WeatherQuery, WeatherRecord, lookup};

use crate::api::AppState;

/// `GET /api/weather?city=<name>`
pub async fn get_weather(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<WeatherRecord>, ApiError> {
    let query = WeatherQuery::from_query_string(raw.as_deref());
    let record = lookup(state.provider.as_ref(), &query).await?;

    tracing::debug!(
        provider = %state.provider.id(),
        city = %record.city,
        temperature = record.temperature,
        "weather resolved"
    );

    Ok(Json(record))
}

/// Error response carrying a JSON `{ "message": ... }` body.
#[derive(Debug)]
pub struct ApiError(WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        match &err {
            WeatherError::Internal(source) => {
                tracing::error!(error = %format!("{source:#}"), "weather lookup failed");
            }
            WeatherError::Upstream { status } => {
                tracing::warn!(status, "weather provider returned an error");
            }
            _ => tracing::debug!(error = %err, "weather lookup rejected"),
        }

        let status =
            StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "message": err.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use axum::{Router, body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt; // for oneshot
    use tracing_test::traced_test;
    use weather_core::provider::{
        static_table::StaticTableProvider, weatherapi::WeatherApiProvider,
    };
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    const API_KEY: &str = "test_api_key_12345";

    fn static_app() -> Router {
        create_router(AppState::new(Arc::new(StaticTableProvider::new())))
    }

    fn remote_app(base_url: impl Into<String>) -> Router {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let provider = WeatherApiProvider::new(API_KEY.into())
            .with_base_url(base_url)
            .with_client(http);
        create_router(AppState::new(Arc::new(provider)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        assert_eq!(
            response.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/json"),
            "{uri}"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes));
        });
        (status, body)
    }

    #[tokio::test]
    async fn missing_city_is_bad_request() {
        for uri in ["/api/weather", "/api/weather?city=", "/api/weather?other=x"] {
            let (status, body) = get(static_app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, json!({ "message": "City parameter is required" }));
        }
    }

    #[tokio::test]
    async fn static_table_hit() {
        let (status, body) = get(static_app(), "/api/weather?city=london").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "city": "London", "temperature": 12, "condition": "Rainy" }));
    }

    #[tokio::test]
    async fn static_table_multi_word_city_is_not_title_cased() {
        let (status, body) = get(static_app(), "/api/weather?city=new%20york").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "city": "New york", "temperature": 22, "condition": "Clear" }));
    }

    #[tokio::test]
    async fn repeated_city_uses_first_value() {
        let (status, body) = get(static_app(), "/api/weather?city=berlin&city=paris").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "city": "Berlin", "temperature": 15, "condition": "Cloudy" }));
    }

    #[tokio::test]
    async fn odd_query_strings_still_answer_json() {
        let cases = [
            ("/api/weather?city", StatusCode::BAD_REQUEST),
            ("/api/weather?&&=&city=", StatusCode::BAD_REQUEST),
            ("/api/weather?city=%FF%FE", StatusCode::NOT_FOUND),
            ("/api/weather?city=%zz", StatusCode::NOT_FOUND),
            ("/api/weather?city=rome&city", StatusCode::OK),
        ];

        for (uri, expected) in cases {
            let (status, body) = get(static_app(), uri).await;
            assert_eq!(status, expected, "{uri}");
            if expected != StatusCode::OK {
                assert!(body["message"].is_string(), "{uri}: {body}");
            }
        }
    }

    #[tokio::test]
    async fn static_table_miss_is_not_found() {
        let (status, body) = get(static_app(), "/api/weather?city=Atlantis").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "City not found" }));
    }

    #[tokio::test]
    async fn identical_requests_get_identical_responses() {
        let app = static_app();

        let first = get(app.clone(), "/api/weather?city=Dubai").await;
        let second = get(app, "/api/weather?city=Dubai").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn remote_provider_response_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("q", "Berlin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": { "name": "Berlin" },
                "current": { "temp_c": 15.7, "condition": { "text": "Partly cloudy" } }
            })))
            .mount(&server)
            .await;

        let (status, body) = get(remote_app(server.uri()), "/api/weather?city=Berlin").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "city": "Berlin", "temperature": 16, "condition": "Partly cloudy" })
        );
    }

    #[tokio::test]
    async fn remote_missing_city_never_calls_provider() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (status, _) = get(remote_app(server.uri()), "/api/weather").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn remote_bad_request_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let (status, body) = get(remote_app(server.uri()), "/api/weather?city=Nowhere").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "City not found" }));
    }

    #[tokio::test]
    async fn remote_failure_status_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "code": 2006, "message": "API key is invalid." }
            })))
            .mount(&server)
            .await;

        let (status, body) = get(remote_app(server.uri()), "/api/weather?city=Berlin").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Failed to fetch weather data" }));
    }

    #[tokio::test]
    async fn remote_network_failure_is_internal_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) =
            get(remote_app(format!("http://{addr}")), "/api/weather?city=London").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "An error occurred while fetching weather data" }));
    }

    #[tokio::test]
    #[traced_test]
    async fn remote_network_failure_log_omits_api_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) =
            get(remote_app(format!("http://{addr}")), "/api/weather?city=London").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains(API_KEY));
        assert!(logs_contain("weather lookup failed"));
        assert!(logs_contain("Failed to send request to WeatherAPI.com"));
        assert!(!logs_contain(API_KEY));
    }

    #[tokio::test]
    async fn remote_malformed_body_does_not_leak_details() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "location": {} })))
            .mount(&server)
            .await;

        let (status, body) = get(remote_app(server.uri()), "/api/weather?city=Berlin").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "An error occurred while fetching weather data" }));
    }
}
