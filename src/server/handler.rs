//! Request handlers.

use super::error::ApiError;
use super::AppState;
use crate::ai::FALLBACK_CAPTION;
use crate::models::{CaptionRequest, CaptionResponse};
use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    Json,
};
use serde_json::{json, Value};

/// Largest request body read from a caller.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Caption endpoint.
///
/// Checks run in a fixed order: method, credential, body. Only when all three
/// pass is the caption service called, exactly once.
pub async fn caption(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<CaptionResponse>, ApiError> {
    if *request.method() != Method::POST {
        tracing::debug!(method = %request.method(), "Rejecting non-POST caption request");
        return Err(ApiError::MethodNotAllowed);
    }

    let Some(captioner) = state.captioner.as_ref() else {
        tracing::error!("GEMINI_API_KEY is not configured; refusing caption request");
        return Err(ApiError::MissingApiKey);
    };

    let payload = read_payload(request.into_body()).await?;
    let description = payload.description().ok_or_else(|| {
        tracing::debug!("Caption request without photoDescription");
        ApiError::MissingDescription
    })?;

    let caption = match captioner.generate_caption(description).await {
        Ok(Some(caption)) => caption,
        Ok(None) => {
            tracing::warn!("Caption provider returned no text, using fallback caption");
            FALLBACK_CAPTION.to_string()
        }
        Err(e) => {
            tracing::debug!("Caption generation failed: {}", e);
            return Err(ApiError::Upstream(e));
        }
    };

    Ok(Json(CaptionResponse { caption }))
}

async fn read_payload(body: Body) -> Result<CaptionRequest, ApiError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            tracing::debug!("Failed to read caption request body: {}", e);
            ApiError::MissingDescription
        })?;

    CaptionRequest::from_slice(&bytes).map_err(|e| {
        tracing::debug!("Caption request body could not be decoded: {}", e);
        ApiError::MissingDescription
    })
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
