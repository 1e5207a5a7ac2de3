use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    api::{self, ApiError},
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    enums::Role,
    state::AppState,
    users::repo::{NewUser, User},
};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn registration(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let RegisterRequest {
        name,
        surname,
        nick_name,
        email,
        age,
        role,
        password,
    } = payload;

    let (Some(name), Some(surname), Some(nick_name), Some(email), Some(age), Some(role), Some(password)) =
        (name, surname, nick_name, email, age, role, password)
    else {
        return Err(api::bad_request("All registration fields are required"));
    };

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(api::bad_request("Invalid email"));
    }

    let Some(role) = Role::parse(&role) else {
        warn!("invalid role in registration");
        return Err(api::bad_request("Invalid role"));
    };

    // Uniqueness is procedural: the schema itself carries no constraint.
    match User::find_by_email(&state.db, &email).await {
        Ok(Some(_)) => {
            warn!(email = %email, "email already registered");
            return Err(api::bad_request("Email already registered"));
        }
        Ok(None) => {}
        Err(e) => return Err(api::internal(e)),
    }

    let password_hash = hash_password(&password).map_err(api::internal)?;

    let user = User::create(
        &state.db,
        &NewUser {
            name: &name,
            surname: &surname,
            nick_name: &nick_name,
            email: &email,
            age,
            role,
            password_hash: &password_hash,
        },
    )
    .await
    .map_err(api::internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            message: "User registered".to_string(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(api::bad_request("Email and password are required"));
    };
    let email = email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "login unknown email");
            return Err(api::bad_request("User does not exist"));
        }
        Err(e) => return Err(api::internal(e)),
    };

    let ok = verify_password(&password, &user.password_hash).map_err(api::internal)?;
    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(api::bad_request("Invalid password"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys
        .sign(user.id, &user.email, user.role)
        .map_err(api::internal)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
        message: "Successfully logged in".to_string(),
    }))
}
