use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::gateway::PixCharge;
use crate::orders::status::{PaymentMethod, TransactionStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub payment_method: String,
    pub payment_gateway: String,
    pub amount: Decimal,
    pub status: String,
    pub gateway_txid: Option<String>,
    pub pix_qr_code: Option<String>,
    pub pix_qr_code_base64: Option<String>,
    pub pix_copy_paste: Option<String>,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    // Raw capture for presential processing; never serialized out.
    #[serde(skip_serializing)]
    pub card_data: Option<serde_json::Value>,
    pub captured_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = r#"
    id, order_id, payment_method, payment_gateway, amount, status,
    gateway_txid, pix_qr_code, pix_qr_code_base64, pix_copy_paste,
    card_brand, card_last4, card_data, captured_at, created_at, updated_at
"#;

pub async fn insert_pix(
    db: &PgPool,
    order_id: Uuid,
    amount: Decimal,
    gateway: &str,
    charge: &PixCharge,
) -> anyhow::Result<TransactionRow> {
    let row = sqlx::query_as::<_, TransactionRow>(&format!(
        r#"
        INSERT INTO transactions
            (order_id, payment_method, payment_gateway, amount, status,
             gateway_txid, pix_qr_code, pix_qr_code_base64, pix_copy_paste)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(order_id)
    .bind(PaymentMethod::Pix.as_str())
    .bind(gateway)
    .bind(amount)
    .bind(TransactionStatus::Pending.as_str())
    .bind(&charge.txid)
    .bind(&charge.copy_paste)
    .bind(&charge.qr_code_base64)
    .bind(&charge.copy_paste)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn insert_card(
    db: &PgPool,
    order_id: Uuid,
    amount: Decimal,
    gateway: &str,
    card_brand: Option<&str>,
    card_last4: Option<&str>,
    card_data: Option<&serde_json::Value>,
) -> anyhow::Result<TransactionRow> {
    let row = sqlx::query_as::<_, TransactionRow>(&format!(
        r#"
        INSERT INTO transactions
            (order_id, payment_method, payment_gateway, amount, status,
             card_brand, card_last4, card_data)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(order_id)
    .bind(PaymentMethod::CreditCard.as_str())
    .bind(gateway)
    .bind(amount)
    .bind(TransactionStatus::Pending.as_str())
    .bind(card_brand)
    .bind(card_last4)
    .bind(card_data)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn find_by_order(db: &PgPool, order_id: Uuid) -> anyhow::Result<Option<TransactionRow>> {
    let row = sqlx::query_as::<_, TransactionRow>(&format!(
        r#"SELECT {COLUMNS} FROM transactions WHERE order_id = $1"#
    ))
    .bind(order_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_by_txid(db: &PgPool, txid: &str) -> anyhow::Result<Option<TransactionRow>> {
    let row = sqlx::query_as::<_, TransactionRow>(&format!(
        r#"SELECT {COLUMNS} FROM transactions WHERE gateway_txid = $1"#
    ))
    .bind(txid)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<TransactionRow>> {
    let rows = sqlx::query_as::<_, TransactionRow>(&format!(
        r#"SELECT {COLUMNS} FROM transactions ORDER BY created_at DESC"#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Settle the transaction; `captured_at` is stamped when it was paid.
pub async fn set_status(
    db: &PgPool,
    id: Uuid,
    status: TransactionStatus,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE transactions
        SET status = $2,
            captured_at = CASE WHEN $2 = 'paid' THEN now() ELSE captured_at END,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .execute(db)
    .await?;
    Ok(())
}
