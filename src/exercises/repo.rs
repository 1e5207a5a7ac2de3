use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::services::ExercisePatch;
use crate::enums::Difficulty;

#[derive(Debug, Clone, FromRow)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl Program {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Program>> {
        let rows = sqlx::query_as::<_, Program>(
            r#"
            SELECT id, name, description
            FROM programs
            WHERE deleted_at IS NULL
            ORDER BY name
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM programs WHERE id = $1 AND deleted_at IS NULL
            )
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(found)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub program_id: Uuid,
}

/// Exercise joined with its owning program, for the public catalogue.
#[derive(Debug, Clone, FromRow)]
pub struct ExerciseProgramRow {
    pub id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub program_id: Uuid,
    pub program_name: String,
    pub program_description: Option<String>,
}

impl Exercise {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Exercise>> {
        let row = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, difficulty, program_id
            FROM exercises
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        difficulty: Difficulty,
        program_id: Uuid,
    ) -> anyhow::Result<Exercise> {
        let row = sqlx::query_as::<_, Exercise>(
            r#"
            INSERT INTO exercises (name, difficulty, program_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, difficulty, program_id
            "#,
        )
        .bind(name)
        .bind(difficulty)
        .bind(program_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Apply an already-diffed patch; unchanged columns keep their value.
    pub async fn update(db: &PgPool, id: Uuid, changes: &ExercisePatch) -> anyhow::Result<Exercise> {
        let row = sqlx::query_as::<_, Exercise>(
            r#"
            UPDATE exercises
            SET name = COALESCE($2, name),
                difficulty = COALESCE($3, difficulty),
                program_id = COALESCE($4, program_id),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, difficulty, program_id
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.difficulty)
        .bind(changes.program_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn soft_delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE exercises
            SET deleted_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn list_with_programs(db: &PgPool) -> anyhow::Result<Vec<ExerciseProgramRow>> {
        let rows = sqlx::query_as::<_, ExerciseProgramRow>(
            r#"
            SELECT e.id, e.name, e.difficulty, e.program_id,
                   p.name AS program_name, p.description AS program_description
            FROM exercises e
            JOIN programs p ON p.id = e.program_id
            WHERE e.deleted_at IS NULL AND p.deleted_at IS NULL
            ORDER BY p.name, e.name
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

/// One occurrence of a user performing an exercise. Repeats of the same
/// (user, exercise) pair are deliberately allowed.
#[derive(Debug, Clone, FromRow)]
pub struct UserExercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_id: Uuid,
    pub completed_at: Option<OffsetDateTime>,
    pub duration: Option<i32>,
}

/// Association row joined with exercise details, used by the profile and
/// admin listing views.
#[derive(Debug, Clone, FromRow)]
pub struct LinkedExerciseRow {
    pub user_id: Uuid,
    pub link_id: Uuid,
    pub completed_at: Option<OffsetDateTime>,
    pub duration: Option<i32>,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub difficulty: Difficulty,
    pub program_id: Uuid,
}

impl UserExercise {
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        exercise_id: Uuid,
        completed_at: Option<OffsetDateTime>,
        duration: Option<i32>,
    ) -> anyhow::Result<UserExercise> {
        let row = sqlx::query_as::<_, UserExercise>(
            r#"
            INSERT INTO user_exercises (user_id, exercise_id, completed_at, duration)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, exercise_id, completed_at, duration
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .bind(completed_at)
        .bind(duration)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Tombstone the row, but only when it belongs to the requesting user.
    /// A miss on either key reports the same "not found" to the caller.
    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE user_exercises
            SET deleted_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Association rows with exercise details, for one user or for all.
    pub async fn list_links(
        db: &PgPool,
        user_id: Option<Uuid>,
    ) -> anyhow::Result<Vec<LinkedExerciseRow>> {
        let rows = sqlx::query_as::<_, LinkedExerciseRow>(
            r#"
            SELECT ue.user_id, ue.id AS link_id, ue.completed_at, ue.duration,
                   e.id AS exercise_id, e.name AS exercise_name, e.difficulty, e.program_id
            FROM user_exercises ue
            JOIN exercises e ON e.id = ue.exercise_id
            WHERE ue.deleted_at IS NULL
              AND e.deleted_at IS NULL
              AND ($1::uuid IS NULL OR ue.user_id = $1)
            ORDER BY ue.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
