//! OAuth 2.0 error responses (RFC 6749 §5.2).

use crate::error::TokenError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// OAuth error code.
    pub error: String,
    /// Human-readable description.
    pub error_description: String,
}

impl From<&TokenError> for ErrorBody {
    fn from(err: &TokenError) -> Self {
        Self {
            error: err.error_code().to_string(),
            error_description: err.public_message(),
        }
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self, "Token endpoint failure");
        }

        let body = ErrorBody::from(&self);
        let mut response = (status, Json(body)).into_response();

        // RFC 6750 §3: resource endpoints answer 401s with a challenge.
        if matches!(
            self,
            Self::MissingToken | Self::InvalidToken | Self::Expired
        ) {
            let challenge = format!("Bearer error=\"{}\"", self.error_code());
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}
