use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{ReviewInput, ReviewStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub customer_name: String,
    pub rating: i32,
    pub comment: String,
    pub review_date: String,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = r#"
    id, product_id, customer_name, rating, comment, review_date, photo_url,
    status, created_at, updated_at
"#;

pub async fn list_published(db: &PgPool) -> anyhow::Result<Vec<ReviewRow>> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        r#"
        SELECT {COLUMNS} FROM reviews
        WHERE status = 'published'
        ORDER BY created_at DESC
        "#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<ReviewRow>> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        r#"SELECT {COLUMNS} FROM reviews ORDER BY created_at DESC"#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, input: &ReviewInput) -> anyhow::Result<ReviewRow> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        r#"
        INSERT INTO reviews
            (product_id, customer_name, rating, comment, review_date, photo_url, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(input.product_id)
    .bind(&input.customer_name)
    .bind(input.rating)
    .bind(&input.comment)
    .bind(&input.review_date)
    .bind(&input.photo_url)
    .bind(input.status.as_str())
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    input: &ReviewInput,
) -> anyhow::Result<Option<ReviewRow>> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        r#"
        UPDATE reviews
        SET product_id = $2, customer_name = $3, rating = $4, comment = $5,
            review_date = $6, photo_url = $7, status = $8, updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(input.product_id)
    .bind(&input.customer_name)
    .bind(input.rating)
    .bind(&input.comment)
    .bind(&input.review_date)
    .bind(&input.photo_url)
    .bind(input.status.as_str())
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn set_status(
    db: &PgPool,
    id: Uuid,
    status: ReviewStatus,
) -> anyhow::Result<Option<ReviewRow>> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        r#"
        UPDATE reviews SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(r#"DELETE FROM reviews WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
