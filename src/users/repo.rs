use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::services::UserPatch;
use crate::enums::Role;

/// User record in the database. Soft-deleted rows (deleted_at set) are
/// invisible to every query here.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub nick_name: String,
    pub email: String,
    pub age: i32,
    pub role: Role,
    pub password_hash: String,
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub nick_name: &'a str,
    pub email: &'a str,
    pub age: i32,
    pub role: Role,
    pub password_hash: &'a str,
}

/// Slim projection for the member-facing user listing.
#[derive(Debug, Clone, FromRow)]
pub struct UserNickname {
    pub id: Uuid,
    pub nick_name: String,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, nick_name, email, age, role, password_hash
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, nick_name, email, age, role, password_hash
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, surname, nick_name, email, age, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, surname, nick_name, email, age, role, password_hash
            "#,
        )
        .bind(new.name)
        .bind(new.surname)
        .bind(new.nick_name)
        .bind(new.email)
        .bind(new.age)
        .bind(new.role)
        .bind(new.password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, nick_name, email, age, role, password_hash
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Admin lookup by id and/or email; both given means both must match.
    pub async fn search(
        db: &PgPool,
        id: Option<Uuid>,
        email: Option<&str>,
    ) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, nick_name, email, age, role, password_hash
            FROM users
            WHERE deleted_at IS NULL
              AND ($1::uuid IS NULL OR id = $1)
              AND ($2::text IS NULL OR email = $2)
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_nicknames(db: &PgPool) -> anyhow::Result<Vec<UserNickname>> {
        let rows = sqlx::query_as::<_, UserNickname>(
            r#"
            SELECT id, nick_name
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY nick_name
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Apply an already-diffed patch; unchanged columns keep their value.
    pub async fn update(db: &PgPool, id: Uuid, changes: &UserPatch) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                surname = COALESCE($3, surname),
                nick_name = COALESCE($4, nick_name),
                age = COALESCE($5, age),
                role = COALESCE($6, role),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, surname, nick_name, email, age, role, password_hash
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.surname.as_deref())
        .bind(changes.nick_name.as_deref())
        .bind(changes.age)
        .bind(changes.role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
