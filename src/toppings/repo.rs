use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToppingRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub is_active: bool,
    pub stock: i32,
    pub display_order: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = r#"
    id, name, category, price, image, is_active, stock, display_order,
    created_at, updated_at
"#;

pub async fn list_active(db: &PgPool) -> anyhow::Result<Vec<ToppingRow>> {
    let rows = sqlx::query_as::<_, ToppingRow>(&format!(
        r#"
        SELECT {COLUMNS} FROM toppings
        WHERE is_active = TRUE
        ORDER BY category ASC, display_order ASC
        "#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    name: &str,
    category: &str,
    price: Decimal,
    display_order: i32,
) -> anyhow::Result<ToppingRow> {
    let row = sqlx::query_as::<_, ToppingRow>(&format!(
        r#"
        INSERT INTO toppings (name, category, price, display_order)
        VALUES ($1, $2, $3, $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(name)
    .bind(category)
    .bind(price)
    .bind(display_order)
    .fetch_one(db)
    .await?;
    Ok(row)
}
