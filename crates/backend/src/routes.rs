use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::domain::a001_waitlist_entry::service::WaitlistService;
use crate::domain::a001_waitlist_entry::store::WaitlistStore;
use crate::handlers;

/// Состояние, общее для всех обработчиков
#[derive(Clone)]
pub struct AppState {
    pub waitlist: WaitlistService,
}

impl AppState {
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        Self {
            waitlist: WaitlistService::new(store),
        }
    }
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // WAITLIST
        // ========================================
        .route(
            "/api/waitlist",
            post(handlers::a001_waitlist_entry::join),
        )
        .route(
            "/api/waitlist/count",
            get(handlers::a001_waitlist_entry::get_count),
        )
        .with_state(state)
}
