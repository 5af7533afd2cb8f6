//! Authorization pipeline middleware.
//!
//! Each layer either passes the request to the next stage or short-circuits
//! with a terminal response. All layers are pure reads over the request and
//! the [`AuthContext`]; no side effects happen before the pipeline completes.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use medirec_auth::{ADMIN_ROLES, AuthContext, AuthzError, Policy, Role, authenticate, authorize};
use medirec_core::AppConfig;

use crate::app::errors::{authn_error_response, authz_error_response};

pub const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AppConfig>,
}

/// Authentication evaluator: bearer header → [`AuthContext`] extension.
///
/// Any failure (missing header, wrong scheme, invalid/expired token) aborts
/// with 401 before the route handler is reached.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = authenticate(bearer_value(req.headers()), &state.config.jwt.secret);
    match outcome {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "request not authenticated");
            authn_error_response(&err)
        }
    }
}

fn bearer_value(headers: &HeaderMap) -> &str {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Role evaluator: admin or super-admin.
pub async fn require_admin(
    axum::Extension(ctx): axum::Extension<AuthContext>,
    req: Request,
    next: Next,
) -> Response {
    guard(authorize(&ctx, &Policy::RoleIn(ADMIN_ROLES)), req, next).await
}

/// Role evaluator: super-admin only (irreversible deletion).
pub async fn require_super_admin(
    axum::Extension(ctx): axum::Extension<AuthContext>,
    req: Request,
    next: Next,
) -> Response {
    guard(authorize(&ctx, &Policy::RoleIn(SUPER_ADMIN_ONLY)), req, next).await
}

/// Ownership evaluator over the `:id` path segment; admin/super-admin bypass.
pub async fn require_owner(
    axum::Extension(ctx): axum::Extension<AuthContext>,
    Path(id): Path<String>,
    req: Request,
    next: Next,
) -> Response {
    guard(authorize(&ctx, &Policy::Owner { resource: &id }), req, next).await
}

async fn guard(decision: Result<(), AuthzError>, req: Request, next: Next) -> Response {
    match decision {
        Ok(()) => next.run(req).await,
        Err(err) => authz_error_response(&err),
    }
}
