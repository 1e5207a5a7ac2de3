use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{Exercise, ExerciseProgramRow, LinkedExerciseRow, Program, UserExercise};
use crate::enums::Difficulty;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<Program> for ProgramView {
    fn from(p: Program) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseView {
    pub id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub program_id: Uuid,
}

impl From<Exercise> for ExerciseView {
    fn from(e: Exercise) -> Self {
        Self {
            id: e.id,
            name: e.name,
            difficulty: e.difficulty,
            program_id: e.program_id,
        }
    }
}

impl From<&LinkedExerciseRow> for ExerciseView {
    fn from(l: &LinkedExerciseRow) -> Self {
        Self {
            id: l.exercise_id,
            name: l.exercise_name.clone(),
            difficulty: l.difficulty,
            program_id: l.program_id,
        }
    }
}

/// Catalogue entry: exercise with its owning program inlined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithProgram {
    pub id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub program: ProgramView,
}

impl From<ExerciseProgramRow> for ExerciseWithProgram {
    fn from(r: ExerciseProgramRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            difficulty: r.difficulty,
            program: ProgramView {
                id: r.program_id,
                name: r.program_name,
                description: r.program_description,
            },
        }
    }
}

/// Per-link metadata of one logged exercise.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMeta {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub duration: Option<i32>,
}

/// Exercise as it appears inside a member profile: entity fields plus the
/// association row's metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
    pub id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub program_id: Uuid,
    pub user_exercise: LinkMeta,
}

impl From<LinkedExerciseRow> for LoggedExercise {
    fn from(l: LinkedExerciseRow) -> Self {
        Self {
            id: l.exercise_id,
            name: l.exercise_name,
            difficulty: l.difficulty,
            program_id: l.program_id,
            user_exercise: LinkMeta {
                id: l.link_id,
                completed_at: l.completed_at,
                duration: l.duration,
            },
        }
    }
}

/// GET /profile/exercises item: the association with exercise inlined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub duration: Option<i32>,
    pub exercise: ExerciseView,
}

impl From<LinkedExerciseRow> for CompletedExercise {
    fn from(l: LinkedExerciseRow) -> Self {
        Self {
            id: l.link_id,
            completed_at: l.completed_at,
            duration: l.duration,
            exercise: ExerciseView {
                id: l.exercise_id,
                name: l.exercise_name,
                difficulty: l.difficulty,
                program_id: l.program_id,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExerciseView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_id: Uuid,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub duration: Option<i32>,
}

impl From<UserExercise> for UserExerciseView {
    fn from(u: UserExercise) -> Self {
        Self {
            id: u.id,
            user_id: u.user_id,
            exercise_id: u.exercise_id,
            completed_at: u.completed_at,
            duration: u.duration,
        }
    }
}

/// Admin create/update body. `difficulty` stays a raw string here and is
/// parsed against the enum in the handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveExerciseRequest {
    pub name: Option<String>,
    pub difficulty: Option<String>,
    pub program_id: Option<Uuid>,
}

/// Member body for logging a performed exercise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogExerciseRequest {
    pub exercise_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub duration: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn completed_exercise_serializes_rfc3339_timestamps() {
        let view = CompletedExercise {
            id: Uuid::nil(),
            completed_at: Some(datetime!(2024-03-01 10:30:00 UTC)),
            duration: Some(40),
            exercise: ExerciseView {
                id: Uuid::nil(),
                name: "Squat".into(),
                difficulty: Difficulty::Medium,
                program_id: Uuid::nil(),
            },
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"completedAt\":\"2024-03-01T10:30:00Z\""));
        assert!(json.contains("\"difficulty\":\"MEDIUM\""));
    }

    #[test]
    fn null_completed_at_stays_null() {
        let view = UserExerciseView {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            exercise_id: Uuid::nil(),
            completed_at: None,
            duration: None,
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"completedAt\":null"));
    }

    #[test]
    fn log_request_parses_optional_fields() {
        let req: LogExerciseRequest = serde_json::from_str(
            r#"{"exerciseId":"00000000-0000-0000-0000-000000000000"}"#,
        )
        .unwrap();
        assert!(req.exercise_id.is_some());
        assert!(req.completed_at.is_none());
        assert!(req.duration.is_none());

        let req: LogExerciseRequest = serde_json::from_str(
            r#"{"exerciseId":"00000000-0000-0000-0000-000000000000","completedAt":"2024-03-01T10:30:00Z","duration":25}"#,
        )
        .unwrap();
        assert_eq!(req.duration, Some(25));
        assert!(req.completed_at.is_some());
    }
}
