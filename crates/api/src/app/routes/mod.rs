//! Route table.
//!
//! Each operation declares its authorization pipeline in place: the
//! authentication layer wraps the whole protected group, and role/ownership
//! guards are attached per route. The first failing layer short-circuits.

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
};

use crate::app::AppState;
use crate::middleware::{
    AuthState, auth_middleware, require_admin, require_owner, require_super_admin,
};

pub mod auth;
pub mod system;
pub mod users;

pub fn router(state: AppState) -> Router {
    let auth_state = AuthState {
        config: state.config.clone(),
    };

    let public = Router::new()
        .route("/health", get(system::health))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login));

    let protected = Router::new()
        // Self-service: the subject comes from the verified token, so no
        // ownership guard is needed.
        .route(
            "/api/v1/users/me",
            get(users::get_my_profile)
                .put(users::update_my_profile)
                .delete(users::delete_my_account),
        )
        .route(
            "/api/v1/users/me/change-password",
            patch(users::change_my_password),
        )
        .route(
            "/api/v1/users/me/deactivate",
            patch(users::deactivate_my_account),
        )
        // Administrative listing/creation.
        .route(
            "/api/v1/users",
            post(users::create_user)
                .get(users::list_users)
                .route_layer(from_fn(require_admin)),
        )
        .route(
            "/api/v1/users/deleted",
            get(users::list_deleted_users).route_layer(from_fn(require_admin)),
        )
        // Profile read is ownership-gated with the built-in admin bypass;
        // mutation stays admin-only.
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .route_layer(from_fn(require_owner))
                .merge(
                    put(users::update_user)
                        .delete(users::soft_delete_user)
                        .route_layer(from_fn(require_admin)),
                ),
        )
        .route(
            "/api/v1/users/:id/restore",
            patch(users::restore_user).route_layer(from_fn(require_admin)),
        )
        .route(
            "/api/v1/users/:id/reset-password",
            patch(users::reset_password).route_layer(from_fn(require_admin)),
        )
        .route(
            "/api/v1/users/:id/activate",
            patch(users::activate_user).route_layer(from_fn(require_admin)),
        )
        .route(
            "/api/v1/users/:id/deactivate",
            patch(users::deactivate_user).route_layer(from_fn(require_admin)),
        )
        // Irreversible deletion is super-admin territory.
        .route(
            "/api/v1/users/:id/hard-delete",
            delete(users::hard_delete_user).route_layer(from_fn(require_super_admin)),
        )
        .layer(from_fn_with_state(auth_state, auth_middleware));

    public.merge(protected).with_state(state)
}
