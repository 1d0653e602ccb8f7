use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::CheckoutRequest;
use super::status::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_document: Option<String>,
    pub delivery_address: String,
    pub delivery_cep: String,
    pub delivery_city: String,
    pub delivery_state: String,
    pub delivery_complement: Option<String>,
    pub items: serde_json::Value,
    pub toppings: serde_json::Value,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,
    pub source: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = r#"
    id, customer_name, customer_phone, customer_email, customer_document,
    delivery_address, delivery_cep, delivery_city, delivery_state,
    delivery_complement, items, toppings, total_amount, payment_method,
    payment_status, status, source, created_at, updated_at
"#;

/// Persists a new order with the snapshot line items; always starts in
/// `pending`/`pending`.
pub async fn insert(
    db: &PgPool,
    req: &CheckoutRequest,
    total_amount: Decimal,
) -> anyhow::Result<OrderRow> {
    let items = serde_json::to_value(&req.items).context("serialize items snapshot")?;
    let toppings = serde_json::to_value(&req.toppings).context("serialize toppings snapshot")?;

    let row = sqlx::query_as::<_, OrderRow>(&format!(
        r#"
        INSERT INTO orders
            (customer_name, customer_phone, customer_email, customer_document,
             delivery_address, delivery_cep, delivery_city, delivery_state,
             delivery_complement, items, toppings, total_amount, payment_method)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&req.customer_name)
    .bind(&req.customer_phone)
    .bind(&req.customer_email)
    .bind(&req.customer_document)
    .bind(&req.delivery_address)
    .bind(&req.delivery_cep)
    .bind(&req.delivery_city)
    .bind(&req.delivery_state)
    .bind(&req.delivery_complement)
    .bind(items)
    .bind(toppings)
    .bind(total_amount)
    .bind(req.payment_method.as_str())
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<OrderRow>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        r#"SELECT {COLUMNS} FROM orders WHERE id = $1"#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<OrderRow>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        r#"SELECT {COLUMNS} FROM orders ORDER BY created_at DESC"#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_recent(db: &PgPool, limit: i64) -> anyhow::Result<Vec<OrderRow>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        r#"SELECT {COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"#
    ))
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn set_status(db: &PgPool, id: Uuid, status: OrderStatus) -> anyhow::Result<()> {
    sqlx::query(r#"UPDATE orders SET status = $2, updated_at = now() WHERE id = $1"#)
        .bind(id)
        .bind(status.as_str())
        .execute(db)
        .await?;
    Ok(())
}

/// Mirrors a settled payment into the order record.
pub async fn set_payment_result(
    db: &PgPool,
    id: Uuid,
    payment_status: PaymentStatus,
    status: Option<OrderStatus>,
) -> anyhow::Result<()> {
    match status {
        Some(status) => {
            sqlx::query(
                r#"
                UPDATE orders
                SET payment_status = $2, status = $3, updated_at = now()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(payment_status.as_str())
            .bind(status.as_str())
            .execute(db)
            .await?;
        }
        None => {
            sqlx::query(
                r#"UPDATE orders SET payment_status = $2, updated_at = now() WHERE id = $1"#,
            )
            .bind(id)
            .bind(payment_status.as_str())
            .execute(db)
            .await?;
        }
    }
    Ok(())
}
