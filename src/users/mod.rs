use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, put},
    Router,
};

use crate::auth::middleware::authorize;
use crate::enums::Role;
use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const USER_ONLY: &[Role] = &[Role::User];

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/all_users", get(handlers::all_users))
        .route(
            "/user",
            get(handlers::find_user).put(handlers::update_user_missing_id),
        )
        .route("/user/:id", put(handlers::update_user))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            authorize(ADMIN_ONLY, req, next)
        }))
}

pub fn member_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/profile", get(handlers::profile))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            authorize(USER_ONLY, req, next)
        }))
}
