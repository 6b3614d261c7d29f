//! HTTP server setup.
//!
//! Builds the axum router around a [`CaptionService`] and runs it until a
//! shutdown signal arrives.

pub mod error;
pub mod handler;

pub use error::ApiError;

use crate::ai::{CaptionService, GeminiCaptionClient};
use crate::models::{Config, HEALTH_ROUTE};
use crate::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Application state injected into handlers.
///
/// `captioner` is `None` when no upstream credential is configured; the
/// caption handler reports that per request instead of refusing to start.
#[derive(Clone, Default)]
pub struct AppState {
    pub captioner: Option<Arc<dyn CaptionService>>,
}

impl AppState {
    pub fn new(captioner: Arc<dyn CaptionService>) -> Self {
        Self {
            captioner: Some(captioner),
        }
    }

    /// State with no credential configured.
    pub fn without_credential() -> Self {
        Self::default()
    }

    /// Build state from configuration, wiring the Gemini client when a key is
    /// present.
    pub fn from_config(config: &Config) -> Self {
        match &config.gemini_api_key {
            Some(api_key) => {
                info!("Caption provider: Gemini (model: {})", config.gemini_model);
                Self::new(Arc::new(GeminiCaptionClient::new_with_client(
                    api_key.clone(),
                    config.gemini_model.clone(),
                    config.gemini_base_url.clone(),
                    reqwest::Client::new(),
                )))
            }
            None => {
                warn!("GEMINI_API_KEY not set; caption requests will fail until it is configured");
                Self::without_credential()
            }
        }
    }
}

/// Build the router with the caption handler mounted at `caption_route`.
///
/// Every response, including framework rejections, carries
/// `Access-Control-Allow-Origin: *`.
pub fn build_router(caption_route: &str, state: AppState) -> Router {
    Router::new()
        .route(caption_route, any(handler::caption))
        .route(HEALTH_ROUTE, get(handler::health))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Router for a loaded [`Config`].
pub fn router_from_config(config: &Config) -> Router {
    build_router(&config.caption_route, AppState::from_config(config))
}

/// Serve `router` on `listener` until Ctrl+C.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockCaptionClient, FALLBACK_CAPTION};
    use crate::models::DEFAULT_CAPTION_ROUTE;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    fn router_with(mock: Arc<MockCaptionClient>) -> Router {
        build_router(DEFAULT_CAPTION_ROUTE, AppState::new(mock))
    }

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(DEFAULT_CAPTION_ROUTE)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(response: &Response) {
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_valid_request_returns_caption() {
        let mock = Arc::new(
            MockCaptionClient::new().with_caption_response("Sprinkled in Santorini ✨".to_string()),
        );

        let response = router_with(mock.clone())
            .oneshot(post(r#"{"photoDescription":"white houses by the sea"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            json!({ "caption": "Sprinkled in Santorini ✨" })
        );
        assert_eq!(mock.descriptions(), vec!["white houses by the sea"]);
    }

    #[tokio::test]
    async fn test_empty_upstream_answer_uses_fallback() {
        let mock = Arc::new(MockCaptionClient::new().with_empty_response());

        let response = router_with(mock)
            .oneshot(post(r#"{"photoDescription":"fog"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "caption": FALLBACK_CAPTION })
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let mock = Arc::new(MockCaptionClient::new().with_failure("connection reset".to_string()));

        let response = router_with(mock)
            .oneshot(post(r#"{"photoDescription":"fog"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to communicate with the AI service." })
        );
    }

    #[tokio::test]
    async fn test_non_post_methods_are_rejected_without_calling_upstream() {
        let mock = Arc::new(MockCaptionClient::new());

        for method in ["GET", "PUT", "DELETE", "PATCH", "OPTIONS"] {
            let response = router_with(mock.clone())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(DEFAULT_CAPTION_ROUTE)
                        .body(Body::from(r#"{"photoDescription":"x"}"#))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
            assert_cors(&response);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(&bytes[..], b"Method Not Allowed");
        }

        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_500_regardless_of_body() {
        for body in ["", "not json", r#"{"photoDescription":"x"}"#] {
            let response = build_router(DEFAULT_CAPTION_ROUTE, AppState::without_credential())
                .oneshot(post(body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_cors(&response);
            assert_eq!(
                body_json(response).await,
                json!({ "error": "Server API key missing." })
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_payloads_are_400() {
        let mock = Arc::new(MockCaptionClient::new());

        for body in [
            "",
            "not json",
            "{}",
            r#"{"photoDescription":""}"#,
            r#"{"photoDescription":null}"#,
            r#"{"photoDescription":7}"#,
            r#"{"description":"wrong field"}"#,
            r#"["sunset over the sea"]"#,
            r#""sunset over the sea""#,
            "null",
        ] {
            let response = router_with(mock.clone()).oneshot(post(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            assert_cors(&response);
            assert_eq!(
                body_json(response).await,
                json!({ "error": "Photo description is required." })
            );
        }

        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_identical_requests_yield_identical_fallback() {
        let mock = Arc::new(MockCaptionClient::new().with_empty_response());
        let router = router_with(mock);

        let first = router
            .clone()
            .oneshot(post(r#"{"photoDescription":"rain"}"#))
            .await
            .unwrap();
        let second = router
            .oneshot(post(r#"{"photoDescription":"rain"}"#))
            .await
            .unwrap();

        assert_eq!(first.status(), second.status());
        assert_eq!(body_json(first).await, body_json(second).await);
    }

    #[tokio::test]
    async fn test_health_and_unknown_routes_carry_cors() {
        let router = build_router(DEFAULT_CAPTION_ROUTE, AppState::without_credential());

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));

        let response = router
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors(&response);
    }

    #[tokio::test]
    async fn test_custom_caption_route() {
        let router = build_router(
            "/.netlify/functions/caption-proxy",
            AppState::new(Arc::new(MockCaptionClient::new())),
        );

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/.netlify/functions/caption-proxy")
                    .body(Body::from(r#"{"photoDescription":"canal"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
