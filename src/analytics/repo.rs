use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalyticsEventRow {
    pub id: Uuid,
    pub event_type: String,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub metadata: Option<Value>,
    pub occurred_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsEventInput {
    pub event_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub order_id: Option<Uuid>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

pub async fn insert(db: &PgPool, input: &AnalyticsEventInput) -> anyhow::Result<AnalyticsEventRow> {
    let row = sqlx::query_as::<_, AnalyticsEventRow>(
        r#"
        INSERT INTO analytics_events
            (event_type, user_id, session_id, product_id, order_id, metadata)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, event_type, user_id, session_id, product_id, order_id,
                  metadata, occurred_at
        "#,
    )
    .bind(&input.event_type)
    .bind(&input.user_id)
    .bind(&input.session_id)
    .bind(input.product_id)
    .bind(input.order_id)
    .bind(&input.metadata)
    .fetch_one(db)
    .await?;
    Ok(row)
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderTotals {
    pub total_orders: i64,
    pub paid_orders: i64,
    pub pending_orders: i64,
    pub cancelled_orders: i64,
    pub total_revenue: Decimal,
}

/// Aggregates across the orders table; revenue counts paid orders only.
pub async fn order_totals(db: &PgPool) -> anyhow::Result<OrderTotals> {
    let totals = sqlx::query_as::<_, OrderTotals>(
        r#"
        SELECT
            COUNT(*) AS total_orders,
            COUNT(*) FILTER (WHERE payment_status = 'paid') AS paid_orders,
            COUNT(*) FILTER (WHERE payment_status = 'pending') AS pending_orders,
            COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_orders,
            COALESCE(SUM(total_amount) FILTER (WHERE payment_status = 'paid'), 0) AS total_revenue
        FROM orders
        "#,
    )
    .fetch_one(db)
    .await?;
    Ok(totals)
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventCount {
    pub event_type: String,
    pub count: i64,
}

pub async fn event_counts(db: &PgPool) -> anyhow::Result<Vec<EventCount>> {
    let rows = sqlx::query_as::<_, EventCount>(
        r#"
        SELECT event_type, COUNT(*) AS count
        FROM analytics_events
        GROUP BY event_type
        ORDER BY count DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
