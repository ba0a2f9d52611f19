use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::users::Role;
use crate::infrastructure::db::PgPool;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(r: &sqlx::postgres::PgRow, with_password: bool) -> UserRow {
    UserRow {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        role: Role::from_db(r.get::<String, _>("role").as_str()),
        password_hash: if with_password {
            r.try_get("password_hash").ok()
        } else {
            None
        },
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> anyhow::Result<UserRow> {
        let row = sqlx::query(
            r#"INSERT INTO users (name, email, role, password_hash) VALUES ($1, $2, $3, $4)
               RETURNING id, name, email, role, password_hash, created_at"#,
        )
        .bind(name)
        .bind(email)
        .bind(role.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_row(&row, false))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, name, email, role, password_hash, created_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| map_row(&r, true)))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, name, email, role, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| map_row(&r, false)))
    }

    async fn find_by_id_with_password(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, name, email, role, password_hash, created_at
               FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| map_row(&r, true)))
    }

    async fn update_details(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"UPDATE users SET name = $2, email = $3 WHERE id = $1
               RETURNING id, name, email, role, created_at"#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| map_row(&r, false)))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"UPDATE users SET reset_password_token = $2, reset_password_expire = $3
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"UPDATE users SET reset_password_token = NULL, reset_password_expire = NULL
               WHERE id = $1"#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, name, email, role, created_at FROM users
               WHERE reset_password_token = $1 AND reset_password_expire > $2"#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| map_row(&r, false)))
    }
}
