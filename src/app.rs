use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/habits/:date",
            get(handlers::get_habits).post(handlers::save_habits),
        )
        .route("/api/stats", get(handlers::get_stats))
        .with_state(state)
}
