use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ProductInput;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub size: String,
    pub image: String,
    pub is_active: bool,
    pub stock: i32,
    pub promo_badge: Option<String>,
    pub promo_end_at: Option<OffsetDateTime>,
    pub highlight_order: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = r#"
    id, name, description, price, size, image, is_active, stock,
    promo_badge, promo_end_at, highlight_order, created_at, updated_at
"#;

/// Storefront view: active products only.
pub async fn list_active(db: &PgPool) -> anyhow::Result<Vec<ProductRow>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        r#"
        SELECT {COLUMNS} FROM products
        WHERE is_active = TRUE
        ORDER BY highlight_order DESC, created_at ASC
        "#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<ProductRow>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        r#"SELECT {COLUMNS} FROM products ORDER BY created_at ASC"#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, input: &ProductInput) -> anyhow::Result<ProductRow> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r#"
        INSERT INTO products
            (name, description, price, size, image, is_active, stock,
             promo_badge, promo_end_at, highlight_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(&input.size)
    .bind(&input.image)
    .bind(input.is_active)
    .bind(input.stock)
    .bind(&input.promo_badge)
    .bind(input.promo_end_at)
    .bind(input.highlight_order)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, input: &ProductInput) -> anyhow::Result<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r#"
        UPDATE products
        SET name = $2, description = $3, price = $4, size = $5, image = $6,
            is_active = $7, stock = $8, promo_badge = $9, promo_end_at = $10,
            highlight_order = $11, updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(&input.size)
    .bind(&input.image)
    .bind(input.is_active)
    .bind(input.stock)
    .bind(&input.promo_badge)
    .bind(input.promo_end_at)
    .bind(input.highlight_order)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(r#"DELETE FROM products WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
