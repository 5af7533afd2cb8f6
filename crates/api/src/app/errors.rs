//! Error → HTTP response mapping.
//!
//! Every taxonomy member maps to a fixed response category with a stable
//! message. Credential failures share one message so that an attacker cannot
//! tell an unknown identifier from a wrong password.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use medirec_accounts::AccountError;
use medirec_auth::{AuthnError, AuthzError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Every authentication failure is a 401; the message distinguishes only the
/// header-shape problems, never anything about the token's contents.
pub fn authn_error_response(err: &AuthnError) -> axum::response::Response {
    let message = match err {
        AuthnError::MissingCredential => "authorization header is required",
        AuthnError::InvalidScheme => "invalid authorization header format",
        AuthnError::Token(_) => "invalid or expired token",
    };
    json_error(StatusCode::UNAUTHORIZED, "unauthenticated", message)
}

pub fn authz_error_response(err: &AuthzError) -> axum::response::Response {
    match err {
        AuthzError::Forbidden => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "access denied: insufficient permissions",
        ),
        AuthzError::BadRequest => {
            json_error(StatusCode::BAD_REQUEST, "bad_request", "invalid user id")
        }
    }
}

pub fn account_error_response(err: AccountError) -> axum::response::Response {
    match err {
        AccountError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        ),
        AccountError::Inactive => json_error(
            StatusCode::UNAUTHORIZED,
            "inactive",
            "account is inactive",
        ),
        AccountError::Forbidden => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "access denied: insufficient permissions",
        ),
        AccountError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "account not found")
        }
        AccountError::Conflict(field) => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("{field} already exists"),
        ),
        AccountError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        // Fail closed: hashing/signing trouble is never downgraded to a
        // business outcome, and the detail stays out of the response.
        AccountError::Codec(_) | AccountError::Token(_) | AccountError::Unavailable(_) => {
            tracing::error!(error = %err, "internal failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}
