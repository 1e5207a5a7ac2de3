use axum::{routing::post, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/registration", post(handlers::registration))
}
