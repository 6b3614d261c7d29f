//! Caller-facing failures of the caption endpoint.

use crate::models::ErrorResponse;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";
pub const MISSING_API_KEY_MESSAGE: &str = "Server API key missing.";
pub const MISSING_DESCRIPTION_MESSAGE: &str = "Photo description is required.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to communicate with the AI service.";

/// Every way a caption request can fail.
///
/// Each variant maps to one fixed status and body; upstream detail stays in
/// the logs.
#[derive(Debug)]
pub enum ApiError {
    /// Any method other than POST (405).
    MethodNotAllowed,
    /// No upstream credential configured (500).
    MissingApiKey,
    /// Body is not JSON or carries no usable `photoDescription` (400).
    MissingDescription,
    /// Upstream unreachable, rejected the call, or returned garbage (500).
    Upstream(crate::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed => f.write_str(METHOD_NOT_ALLOWED_BODY),
            Self::MissingApiKey => f.write_str(MISSING_API_KEY_MESSAGE),
            Self::MissingDescription => f.write_str(MISSING_DESCRIPTION_MESSAGE),
            Self::Upstream(err) => write!(f, "{}: {}", UPSTREAM_FAILURE_MESSAGE, err),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        Self::Upstream(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingApiKey | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingDescription => StatusCode::BAD_REQUEST,
        }
    }

    fn json(status: StatusCode, message: &str) -> Response {
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = match &self {
            Self::MethodNotAllowed => (status, METHOD_NOT_ALLOWED_BODY).into_response(),
            Self::MissingApiKey => Self::json(status, MISSING_API_KEY_MESSAGE),
            Self::MissingDescription => Self::json(status, MISSING_DESCRIPTION_MESSAGE),
            Self::Upstream(_) => Self::json(status, UPSTREAM_FAILURE_MESSAGE),
        };

        // Rejections that happen before the body is read also advertise the
        // headers a browser may send.
        if matches!(self, Self::MethodNotAllowed | Self::MissingApiKey) {
            response.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            );
        }

        response
    }
}
