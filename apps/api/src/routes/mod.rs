pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Skill extraction
        .route("/api/v1/skills/extract", post(skills::handle_extract_skills))
        .route("/api/v1/documents/parse", post(skills::handle_parse_document))
        .route(
            "/api/v1/documents/upload",
            post(skills::handle_upload_document),
        )
        // Match scoring
        .route("/api/v1/match", post(matching::handle_match))
        .route("/api/v1/match/batch", post(matching::handle_match_batch))
        .layer(body_limit)
        .with_state(state)
}
