pub mod gif;
pub mod health;
pub mod picture;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/text-to-picture", get(picture::text_to_picture_handler))
        .route("/text-to-gif", get(gif::text_to_gif_handler))
        .with_state(state)
}
