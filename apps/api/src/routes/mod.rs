pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/interviews", post(handlers::handle_start_interview))
        .route(
            "/api/v1/interviews/upload",
            post(handlers::handle_upload_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            get(handlers::handle_get_interview).delete(handlers::handle_end_interview),
        )
        .route(
            "/api/v1/interviews/:id/questions",
            get(handlers::handle_get_questions),
        )
        .route(
            "/api/v1/interviews/:id/responses",
            post(handlers::handle_respond),
        )
        .with_state(state)
}
