use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    api::{self, ApiError, DataResponse},
    auth::middleware::Identity,
    enums::Role,
    exercises::repo::UserExercise,
    state::AppState,
};

use super::{
    dto::{AdminUserView, AllUsersQuery, NicknameView, ProfileView, PublicUser, UpdateUserRequest, UserQuery},
    repo::User,
    services::{self, UserPatch},
};

#[instrument(skip(state))]
pub async fn all_users(
    State(state): State<AppState>,
    Query(q): Query<AllUsersQuery>,
) -> Result<Json<DataResponse<Vec<AdminUserView>>>, ApiError> {
    let users = User::list(&state.db).await.map_err(api::internal)?;
    if users.is_empty() {
        return Err(api::not_found("No users exist"));
    }

    let views = if q.exercises {
        let links = UserExercise::list_links(&state.db, None)
            .await
            .map_err(api::internal)?;
        services::attach_exercises(users, &links)
    } else {
        users.into_iter().map(AdminUserView::from).collect()
    };

    Ok(api::data(views, "List of users"))
}

#[instrument(skip(state))]
pub async fn find_user(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<Json<DataResponse<Vec<AdminUserView>>>, ApiError> {
    if q.id.is_none() && q.email.is_none() {
        return Err(api::bad_request("Email or ID is required"));
    }

    let users = User::search(&state.db, q.id, q.email.as_deref())
        .await
        .map_err(api::internal)?;
    if users.is_empty() {
        warn!(id = ?q.id, email = ?q.email, "user lookup empty");
        return Err(api::not_found("User not found"));
    }

    let views = if q.exercises {
        let links = UserExercise::list_links(&state.db, None)
            .await
            .map_err(api::internal)?;
        services::attach_exercises(users, &links)
    } else {
        users.into_iter().map(AdminUserView::from).collect()
    };

    Ok(api::data(views, "User found"))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    let Some(user) = User::find_by_id(&state.db, id).await.map_err(api::internal)? else {
        return Err(api::not_found("User does not exist"));
    };

    let role = match payload.role.as_deref() {
        Some(raw) => {
            Some(Role::parse(raw).ok_or_else(|| api::bad_request("Invalid role"))?)
        }
        None => None,
    };

    let patch = UserPatch {
        name: payload.name,
        surname: payload.surname,
        nick_name: payload.nick_name,
        age: payload.age,
        role,
    };

    let changes = patch.diff_against(&user);
    if changes.is_empty() {
        return Ok(api::message("No changes made").into_response());
    }

    let updated = User::update(&state.db, id, &changes)
        .await
        .map_err(api::internal)?;
    info!(user_id = %id, "user updated");
    Ok(api::data(PublicUser::from(updated), "User updated").into_response())
}

pub async fn update_user_missing_id() -> ApiError {
    api::bad_request("Missing required parameter: id")
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<NicknameView>>>, ApiError> {
    let users = User::list_nicknames(&state.db).await.map_err(api::internal)?;
    if users.is_empty() {
        return Err(api::not_found("No users exist"));
    }
    let views = users.into_iter().map(NicknameView::from).collect::<Vec<_>>();
    Ok(api::data(views, "List of users"))
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<DataResponse<ProfileView>>, ApiError> {
    let Some(user) = User::find_by_id(&state.db, identity.id)
        .await
        .map_err(api::internal)?
    else {
        warn!(user_id = %identity.id, "token subject no longer exists");
        return Err(api::not_found("User not found"));
    };

    let links = UserExercise::list_links(&state.db, Some(user.id))
        .await
        .map_err(api::internal)?;

    Ok(api::data(services::profile_view(user, links), "User found"))
}
