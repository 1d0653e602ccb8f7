use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use super::repo::{self, AnalyticsEventInput, EventCount, OrderTotals};
use crate::auth::services::AuthAdmin;
use crate::error::internal;
use crate::orders::repo::OrderRow;
use crate::state::AppState;

pub fn public_router() -> Router<AppState> {
    Router::new().route("/analytics/events", post(ingest_event))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/admin/analytics", get(summary))
}

#[instrument(skip(state, input), fields(event_type = %input.event_type))]
pub async fn ingest_event(
    State(state): State<AppState>,
    Json(input): Json<AnalyticsEventInput>,
) -> Result<StatusCode, (StatusCode, String)> {
    if input.event_type.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "event_type is required".into()));
    }
    repo::insert(&state.db, &input).await.map_err(internal)?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    #[serde(flatten)]
    pub totals: OrderTotals,
    /// Fraction of orders that reached paid, 0.0 when there are none.
    pub conversion_rate: f64,
    pub events: Vec<EventCount>,
    pub recent_orders: Vec<OrderRow>,
}

#[instrument(skip(state, _admin))]
pub async fn summary(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> Result<Json<AnalyticsSummary>, (StatusCode, String)> {
    let totals = repo::order_totals(&state.db).await.map_err(internal)?;
    let events = repo::event_counts(&state.db).await.map_err(internal)?;
    let recent_orders = crate::orders::repo::list_recent(&state.db, 10)
        .await
        .map_err(internal)?;

    let conversion_rate = if totals.total_orders > 0 {
        totals.paid_orders as f64 / totals.total_orders as f64
    } else {
        0.0
    };

    Ok(Json(AnalyticsSummary {
        totals,
        conversion_rate,
        events,
        recent_orders,
    }))
}
