use serde::{Deserialize, Serialize};

use crate::users::dto::PublicUser;

/// Request body for user registration. Fields are options so that a
/// missing field maps to a 400, not a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub nick_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
    pub message: String,
}

/// Response returned after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
    pub message: String,
}
