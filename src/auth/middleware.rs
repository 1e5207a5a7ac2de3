use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::{JwtKeys, TokenError};
use crate::{api, enums::Role, state::AppState};

/// Verified identity attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Authentication stage: verify the `authorization` header and attach the
/// decoded identity to request extensions. The header carries the raw
/// token string; a `Bearer ` prefix is tolerated and stripped.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let keys = JwtKeys::from_ref(&state);

    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(raw) = header else {
        warn!(error = %TokenError::Missing, "authentication failed");
        return api::unauthorized().into_response();
    };

    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);

    match keys.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(Identity {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            });
            next.run(req).await
        }
        Err(e) => {
            warn!(error = %e, "authentication failed");
            api::unauthorized().into_response()
        }
    }
}

pub fn role_permitted(permitted: &[Role], role: Role) -> bool {
    permitted.contains(&role)
}

/// Authorization stage: a route group declares the set of roles it
/// accepts; anything else gets a 403. Must run after [`authenticate`].
pub async fn authorize(permitted: &'static [Role], req: Request, next: Next) -> Response {
    let Some(identity) = req.extensions().get::<Identity>() else {
        return api::unauthorized().into_response();
    };
    if !role_permitted(permitted, identity.role) {
        warn!(user_id = %identity.id, role = ?identity.role, "role not permitted");
        return api::forbidden().into_response();
    }
    next.run(req).await
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = api::ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(api::unauthorized)
    }
}
