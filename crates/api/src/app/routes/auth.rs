//! Public authentication routes: registration and login.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use medirec_accounts::NewAccount;

use crate::app::AppState;
use crate::app::dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::app::errors::account_error_response;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let new = NewAccount {
        username: req.username,
        email: req.email,
        phone: req.phone,
        password: req.password,
        role: req.role,
        active: None,
    };

    match state.service.register(new) {
        Ok(account) => {
            (StatusCode::CREATED, Json(UserResponse::from(&account))).into_response()
        }
        Err(err) => account_error_response(err),
    }
}

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.service.login(&req.username_or_email, &req.password) {
        Ok(outcome) => Json(LoginResponse {
            token: outcome.token,
            expires_at: outcome.expires_at,
            user: UserResponse::from(&outcome.account),
        })
        .into_response(),
        Err(err) => account_error_response(err),
    }
}
