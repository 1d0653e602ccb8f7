use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::AdminUser;

impl AdminUser {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<AdminUser>> {
        let user = sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, email, password_hash, name, role, created_at, updated_at
            FROM admin_users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<AdminUser>> {
        let user = sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, email, password_hash, name, role, created_at, updated_at
            FROM admin_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> anyhow::Result<AdminUser> {
        let user = sqlx::query_as::<_, AdminUser>(
            r#"
            INSERT INTO admin_users (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, name, role, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
