use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{User, UserNickname};
use crate::enums::Role;
use crate::exercises::dto::{ExerciseView, LoggedExercise};

/// Public part of a user record: everything except the password hash and
/// the bookkeeping columns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub nick_name: String,
    pub email: String,
    pub age: i32,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            surname: u.surname,
            nick_name: u.nick_name,
            email: u.email,
            age: u.age,
            role: u.role,
        }
    }
}

/// Admin listing shape; `exercises` appears only when the caller asked
/// for the flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub nick_name: String,
    pub email: String,
    pub age: i32,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<ExerciseView>>,
}

impl AdminUserView {
    pub fn with_exercises(user: User, exercises: Vec<ExerciseView>) -> Self {
        let mut view = AdminUserView::from(user);
        view.exercises = Some(exercises);
        view
    }
}

impl From<User> for AdminUserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            surname: u.surname,
            nick_name: u.nick_name,
            email: u.email,
            age: u.age,
            role: u.role,
            exercises: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NicknameView {
    pub id: Uuid,
    pub nick_name: String,
}

impl From<UserNickname> for NicknameView {
    fn from(u: UserNickname) -> Self {
        Self {
            id: u.id,
            nick_name: u.nick_name,
        }
    }
}

/// The requesting member plus every logged exercise with link metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub nick_name: String,
    pub email: String,
    pub age: i32,
    pub role: Role,
    pub exercises: Vec<LoggedExercise>,
}

/// Admin PUT /user/:id body. `role` stays a raw string here and is parsed
/// against the enum in the handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub nick_name: Option<String>,
    pub age: Option<i32>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub id: Option<Uuid>,
    pub email: Option<String>,
    #[serde(default)]
    pub exercises: bool,
}

#[derive(Debug, Deserialize)]
pub struct AllUsersQuery {
    #[serde(default)]
    pub exercises: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::nil(),
            name: "Jana".into(),
            surname: "Novak".into(),
            nick_name: "jn".into(),
            email: "jana@example.com".into(),
            age: 30,
            role: Role::Admin,
            password_hash: "$argon2id$secret".into(),
        }
    }

    #[test]
    fn public_user_never_exposes_the_hash() {
        let json = serde_json::to_string(&PublicUser::from(sample_user())).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn wire_fields_are_camel_case() {
        let json = serde_json::to_string(&PublicUser::from(sample_user())).unwrap();
        assert!(json.contains("\"nickName\":\"jn\""));
        assert!(json.contains("\"role\":\"ADMIN\""));
    }

    #[test]
    fn admin_view_omits_exercises_unless_requested() {
        let plain = serde_json::to_string(&AdminUserView::from(sample_user())).unwrap();
        assert!(!plain.contains("exercises"));

        let with = AdminUserView::with_exercises(sample_user(), vec![]);
        let json = serde_json::to_string(&with).unwrap();
        assert!(json.contains("\"exercises\":[]"));
    }
}
