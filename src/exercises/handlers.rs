use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    api::{self, ApiError, DataResponse},
    auth::middleware::Identity,
    enums::{Difficulty, Role},
    state::AppState,
};

use super::{
    dto::{
        CompletedExercise, ExerciseView, ExerciseWithProgram, LogExerciseRequest, ProgramView,
        SaveExerciseRequest, UserExerciseView,
    },
    repo::{Exercise, Program, UserExercise},
    services::ExercisePatch,
};

#[instrument(skip(state))]
pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<ProgramView>>>, ApiError> {
    let programs = Program::list(&state.db).await.map_err(api::internal)?;
    let views = programs.into_iter().map(ProgramView::from).collect::<Vec<_>>();
    Ok(api::data(views, "List of programs"))
}

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<ExerciseWithProgram>>>, ApiError> {
    let rows = Exercise::list_with_programs(&state.db)
        .await
        .map_err(api::internal)?;
    let views = rows
        .into_iter()
        .map(ExerciseWithProgram::from)
        .collect::<Vec<_>>();
    Ok(api::data(views, "List of exercises"))
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn completed_exercises(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<DataResponse<Vec<CompletedExercise>>>, ApiError> {
    let links = UserExercise::list_links(&state.db, Some(identity.id))
        .await
        .map_err(api::internal)?;
    // Empty list is deliberately a 404, not an empty 200.
    if links.is_empty() {
        return Err(api::not_found("No completed exercises"));
    }
    let items = links
        .into_iter()
        .map(CompletedExercise::from)
        .collect::<Vec<_>>();
    Ok(api::data(items, "List of completed exercises"))
}

/// POST /exercise is mounted once for both roles: an admin creates an
/// exercise entity, a member logs a performed one. The two bodies share
/// no fields, so the fork deserializes per role.
#[instrument(skip(state, identity, body), fields(user_id = %identity.id, role = ?identity.role))]
pub async fn post_exercise(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    match identity.role {
        Role::Admin => {
            let req: SaveExerciseRequest = serde_json::from_value(body)
                .map_err(|_| api::bad_request("Invalid request body"))?;
            create_exercise(&state, req).await
        }
        Role::User => {
            let req: LogExerciseRequest = serde_json::from_value(body)
                .map_err(|_| api::bad_request("Invalid request body"))?;
            log_exercise(&state, identity.id, req).await
        }
    }
}

async fn create_exercise(
    state: &AppState,
    req: SaveExerciseRequest,
) -> Result<Response, ApiError> {
    let (Some(name), Some(difficulty), Some(program_id)) =
        (req.name, req.difficulty, req.program_id)
    else {
        return Err(api::bad_request("Name, difficulty, programId are required"));
    };

    let Some(difficulty) = Difficulty::parse(&difficulty) else {
        return Err(api::bad_request("Invalid difficulty level"));
    };

    if !Program::exists(&state.db, program_id)
        .await
        .map_err(api::internal)?
    {
        return Err(api::not_found("Program does not exist"));
    }

    let exercise = Exercise::create(&state.db, &name, difficulty, program_id)
        .await
        .map_err(api::internal)?;
    info!(exercise_id = %exercise.id, "exercise created");
    Ok((
        StatusCode::CREATED,
        api::data(ExerciseView::from(exercise), "Exercise created"),
    )
        .into_response())
}

async fn log_exercise(
    state: &AppState,
    user_id: Uuid,
    req: LogExerciseRequest,
) -> Result<Response, ApiError> {
    let Some(exercise_id) = req.exercise_id else {
        return Err(api::bad_request("Exercise ID is required"));
    };

    if Exercise::find_by_id(&state.db, exercise_id)
        .await
        .map_err(api::internal)?
        .is_none()
    {
        return Err(api::not_found("Exercise does not exist"));
    }

    let link = UserExercise::insert(&state.db, user_id, exercise_id, req.completed_at, req.duration)
        .await
        .map_err(api::internal)?;
    info!(user_id = %user_id, exercise_id = %exercise_id, "exercise logged");
    Ok(api::data(UserExerciseView::from(link), "Exercise added").into_response())
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn update_exercise(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveExerciseRequest>,
) -> Result<Response, ApiError> {
    if identity.role != Role::Admin {
        return Err(api::forbidden());
    }

    let Some(exercise) = Exercise::find_by_id(&state.db, id)
        .await
        .map_err(api::internal)?
    else {
        return Err(api::not_found("Exercise does not exist"));
    };

    if payload.name.is_none() && payload.difficulty.is_none() && payload.program_id.is_none() {
        return Err(api::bad_request("No changes made"));
    }

    let difficulty = match payload.difficulty.as_deref() {
        Some(raw) => {
            Some(Difficulty::parse(raw).ok_or_else(|| api::bad_request("Invalid difficulty level"))?)
        }
        None => None,
    };

    let patch = ExercisePatch {
        name: payload.name,
        difficulty,
        program_id: payload.program_id,
    };

    let changes = patch.diff_against(&exercise);
    if changes.is_empty() {
        return Ok(api::message("No changes made").into_response());
    }

    if let Some(program_id) = changes.program_id {
        if !Program::exists(&state.db, program_id)
            .await
            .map_err(api::internal)?
        {
            return Err(api::not_found("Program does not exist"));
        }
    }

    let updated = Exercise::update(&state.db, id, &changes)
        .await
        .map_err(api::internal)?;
    info!(exercise_id = %id, "exercise updated");
    Ok(api::data(ExerciseView::from(updated), "Exercise updated").into_response())
}

/// DELETE /exercise/:id is mounted once for both roles: an admin
/// tombstones the exercise entity, a member removes one of their own
/// logged rows (ownership checked, misses never leak existence).
#[instrument(skip(state, identity), fields(user_id = %identity.id, role = ?identity.role))]
pub async fn delete_exercise(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    match identity.role {
        Role::Admin => {
            if Exercise::find_by_id(&state.db, id)
                .await
                .map_err(api::internal)?
                .is_none()
            {
                return Err(api::not_found("Exercise does not exist"));
            }
            Exercise::soft_delete(&state.db, id)
                .await
                .map_err(api::internal)?;
            info!(exercise_id = %id, "exercise deleted");
            Ok(api::message("Exercise deleted").into_response())
        }
        Role::User => {
            let removed = UserExercise::delete_owned(&state.db, identity.id, id)
                .await
                .map_err(api::internal)?;
            if !removed {
                warn!(user_id = %identity.id, link_id = %id, "logged exercise not owned or missing");
                return Err(api::not_found("Wrong exercise"));
            }
            info!(user_id = %identity.id, link_id = %id, "logged exercise removed");
            Ok(api::message("Exercise deleted").into_response())
        }
    }
}

pub async fn put_missing_id(identity: Identity) -> ApiError {
    if identity.role != Role::Admin {
        return api::forbidden();
    }
    api::bad_request("Missing required parameter: id")
}

pub async fn delete_missing_id() -> ApiError {
    api::bad_request("Missing required parameter: id")
}
