//! Application wiring: state, routes, DTOs, error mapping.

use std::sync::Arc;

use axum::Router;

use medirec_accounts::AccountService;
use medirec_core::AppConfig;
use medirec_directory::InMemoryDirectory;

pub mod dto;
pub mod errors;
pub mod routes;

/// Service over the in-memory directory (tests/dev). A persistent directory
/// implementation slots in here without touching handlers.
pub type DirectoryService = AccountService<InMemoryDirectory>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DirectoryService>,
    pub config: Arc<AppConfig>,
}

/// Build the full router over a fresh in-memory directory.
pub fn build_app(config: AppConfig) -> Router {
    let service = Arc::new(AccountService::new(InMemoryDirectory::new(), config.clone()));
    let state = AppState {
        service,
        config: Arc::new(config),
    };
    routes::router(state)
}
