//! User routes: self-service (`/me`) and administrative management.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use medirec_accounts::{AccountUpdate, LifecycleTransition, ListQuery, NewAccount};
use medirec_auth::AuthContext;
use medirec_core::UserId;

use crate::app::AppState;
use crate::app::dto::{
    ChangePasswordRequest, CreateUserRequest, DeactivateAccountRequest, DeleteAccountRequest,
    DeletedUserListResponse, DeletedUserResponse, ListUsersQuery, MessageResponse,
    ResetPasswordRequest, UpdateProfileRequest, UpdateUserRequest, UserListResponse, UserResponse,
};
use crate::app::errors::{account_error_response, json_error};

fn parse_id(raw: &str) -> Result<UserId, Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "bad_request", "invalid user id"))
}

fn to_list_query(query: ListUsersQuery) -> ListQuery {
    ListQuery {
        page: query.page,
        page_size: query.page_size,
        search: query.search,
        role: query.role,
        active: query.is_active,
        sort_by: query.sort_by,
        sort_dir: query.sort_dir,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Self-service (/me)
// ─────────────────────────────────────────────────────────────────────────────

pub async fn get_my_profile(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
) -> Response {
    match state.service.get(ctx.subject()) {
        Ok(account) => Json(UserResponse::from(&account)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn update_my_profile(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Response {
    let update = AccountUpdate {
        username: req.username,
        email: req.email,
        phone: req.phone,
        password: req.password,
        ..Default::default()
    };

    match state.service.update(ctx.subject(), update) {
        Ok(account) => Json(UserResponse::from(&account)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn change_my_password(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Response {
    match state
        .service
        .change_password(ctx.subject(), &req.old_password, &req.new_password)
    {
        Ok(()) => Json(MessageResponse {
            message: "password changed",
        })
        .into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn delete_my_account(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Json(req): Json<DeleteAccountRequest>,
) -> Response {
    match state.service.set_lifecycle_state(
        &ctx,
        ctx.subject(),
        LifecycleTransition::SoftDelete,
        Some(&req.password),
    ) {
        Ok(()) => Json(MessageResponse {
            message: "account deleted",
        })
        .into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn deactivate_my_account(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Json(req): Json<DeactivateAccountRequest>,
) -> Response {
    match state.service.set_lifecycle_state(
        &ctx,
        ctx.subject(),
        LifecycleTransition::Deactivate,
        Some(&req.password),
    ) {
        Ok(()) => Json(MessageResponse {
            message: "account deactivated",
        })
        .into_response(),
        Err(err) => account_error_response(err),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Administrative
// ─────────────────────────────────────────────────────────────────────────────

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    let new = NewAccount {
        username: req.username,
        email: req.email,
        phone: req.phone,
        password: req.password,
        role: req.role,
        active: req.is_active,
    };

    match state.service.create(new) {
        Ok(account) => {
            (StatusCode::CREATED, Json(UserResponse::from(&account))).into_response()
        }
        Err(err) => account_error_response(err),
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Response {
    match state.service.list(to_list_query(query)) {
        Ok(page) => Json(UserListResponse {
            data: page.items.iter().map(UserResponse::from).collect(),
            meta: page.meta,
        })
        .into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn list_deleted_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Response {
    match state.service.list_deleted(to_list_query(query)) {
        Ok(page) => Json(DeletedUserListResponse {
            data: page.items.iter().map(DeletedUserResponse::from).collect(),
            meta: page.meta,
        })
        .into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.get(id) {
        Ok(account) => Json(UserResponse::from(&account)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let update = AccountUpdate {
        username: req.username,
        email: req.email,
        phone: req.phone,
        password: req.password,
        role: req.role,
        active: req.is_active,
    };

    match state.service.update(id, update) {
        Ok(account) => Json(UserResponse::from(&account)).into_response(),
        Err(err) => account_error_response(err),
    }
}

async fn lifecycle(
    state: &AppState,
    ctx: &AuthContext,
    raw_id: &str,
    transition: LifecycleTransition,
    success: &'static str,
) -> Response {
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .service
        .set_lifecycle_state(ctx, id, transition, None)
    {
        Ok(()) => Json(MessageResponse { message: success }).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub async fn soft_delete_user(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    lifecycle(
        &state,
        &ctx,
        &id,
        LifecycleTransition::SoftDelete,
        "account deleted",
    )
    .await
}

pub async fn restore_user(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    lifecycle(
        &state,
        &ctx,
        &id,
        LifecycleTransition::Restore,
        "account restored",
    )
    .await
}

pub async fn activate_user(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    lifecycle(
        &state,
        &ctx,
        &id,
        LifecycleTransition::Activate,
        "account activated",
    )
    .await
}

pub async fn deactivate_user(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    lifecycle(
        &state,
        &ctx,
        &id,
        LifecycleTransition::Deactivate,
        "account deactivated",
    )
    .await
}

pub async fn hard_delete_user(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    lifecycle(
        &state,
        &ctx,
        &id,
        LifecycleTransition::HardDelete,
        "account permanently deleted",
    )
    .await
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.reset_password(id, &req.new_password) {
        Ok(()) => Json(MessageResponse {
            message: "password reset",
        })
        .into_response(),
        Err(err) => account_error_response(err),
    }
}
