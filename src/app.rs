//! Shared application state and HTTP router.

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::TransferStrategy,
    db::DbPool,
    handlers,
    repository::MemberRepository,
    services::{DestinationGuard, TransferService},
};

/// State shared with every handler via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub members: MemberRepository,
    pub transfers: TransferService,
}

impl AppState {
    pub fn new(pool: DbPool, strategy: TransferStrategy, guard: Arc<dyn DestinationGuard>) -> Self {
        Self {
            members: MemberRepository::new(pool.clone()),
            transfers: TransferService::new(strategy, pool.clone(), guard),
            pool,
        }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

/// Build the HTTP router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public routes
        .route("/health", get(handlers::health::health_check))
        // Member routes
        .route(
            "/api/v1/members",
            post(handlers::members::save_member).get(handlers::members::list_members),
        )
        .route(
            "/api/v1/members/{id}",
            get(handlers::members::get_member)
                .put(handlers::members::update_member)
                .delete(handlers::members::delete_member),
        )
        // Transfer routes
        .route(
            "/api/v1/transfers",
            post(handlers::transfers::create_transfer),
        )
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
