use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Session token or request body could not be parsed.
    #[error("Malformed token or request")]
    Malformed,

    /// Token MAC does not verify.
    ///
    /// Also covers tokens replayed from another client IP, tokens carrying an
    /// identity other than the one they were signed for, tokens signed on a
    /// previous day, and tokens declaring an algorithm other than HS256.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token is past the expiry embedded in its claims.
    #[error("Token expired")]
    Expired,

    /// Missing or unknown API key on an API-key gated route, outside localhost.
    #[error("Invalid Api-Key")]
    Unauthorized,

    /// No session cookie on a session gated route, outside localhost.
    #[error("Missing session cookie")]
    Forbidden,

    /// Login email and password do not match a stored user.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Token could not be encoded.
    #[error("Failed to sign session token: {0}")]
    SigningError(String),

    /// Handler asked for the caller identity on a route with no access gate.
    #[error("User Not Found")]
    IdentityNotFound,
}

impl AuthError {
    /// Status code returned to the client for this rejection.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Malformed | Self::InvalidSignature | Self::Expired | Self::Forbidden => {
                StatusCode::FORBIDDEN
            }
            Self::SigningError(_) | Self::IdentityNotFound => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts authentication errors into HTTP responses.
///
/// The body never says which check failed, so a client cannot learn whether a
/// route is guarded by an API key or by a session cookie. The precise reason is
/// logged at debug level instead.
///
/// # Returns
/// - 401 Unauthorized - For `Unauthorized` and `InvalidCredentials`
/// - 403 Forbidden - For missing cookies and every token verification failure
/// - 500 Internal Server Error - For signing failures and missing identities
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!("Request rejected: {}", self);

        let error = match status {
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            _ => "Internal server error",
        };

        (
            status,
            Json(ErrorDto {
                error: error.to_string(),
            }),
        )
            .into_response()
    }
}
