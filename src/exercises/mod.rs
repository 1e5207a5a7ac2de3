use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post, put},
    Router,
};

use crate::auth::middleware::authorize;
use crate::enums::Role;
use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

const USER_ONLY: &[Role] = &[Role::User];
const ANY_ROLE: &[Role] = &[Role::Admin, Role::User];

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/programs", get(handlers::list_programs))
        .route("/exercises", get(handlers::list_exercises))
}

pub fn member_router() -> Router<AppState> {
    Router::new()
        .route("/profile/exercises", get(handlers::completed_exercises))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            authorize(USER_ONLY, req, next)
        }))
}

/// `/exercise` routes are shared between roles; the handlers fork on the
/// authenticated role where the admin and member meanings differ.
pub fn shared_router() -> Router<AppState> {
    Router::new()
        .route(
            "/exercise",
            post(handlers::post_exercise)
                .put(handlers::put_missing_id)
                .delete(handlers::delete_missing_id),
        )
        .route(
            "/exercise/:id",
            put(handlers::update_exercise).delete(handlers::delete_exercise),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            authorize(ANY_ROLE, req, next)
        }))
}
