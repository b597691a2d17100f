use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/event", post(handlers::event_form))
        .route("/save", post(handlers::save_form))
        .route("/snapshot", post(handlers::snapshot_form))
        .route("/report", get(handlers::report))
        .route("/api/view", get(handlers::get_view))
        .route("/api/event", post(handlers::event))
        .route("/api/save", post(handlers::save))
        .route("/api/snapshot", post(handlers::snapshot))
        .with_state(state)
}
