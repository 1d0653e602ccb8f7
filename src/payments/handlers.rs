use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::repo::{self, TransactionRow};
use crate::auth::services::AuthAdmin;
use crate::error::internal;
use crate::orders::status::{OrderStatus, PaymentStatus, TransactionStatus};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhooks/pix", post(pix_webhook))
        .route("/orders/:id/payment-status", get(payment_status))
        .route("/admin/transactions", get(list_transactions))
}

/// Translates a gateway status string into our transaction status. Pagou.ai
/// reports both its own vocabulary and the BACEN PIX one depending on the
/// event, so both are accepted.
pub fn map_webhook_status(raw: &str) -> Option<TransactionStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "paid" | "approved" | "concluida" | "concluída" => Some(TransactionStatus::Paid),
        "failed" | "rejected" | "error" => Some(TransactionStatus::Failed),
        "cancelled" | "canceled" | "expired" | "removida_pelo_usuario_recebedor" => {
            Some(TransactionStatus::Cancelled)
        }
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct PixWebhookPayload {
    pub txid: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Payment confirmation entry point. The gateway calls this when a charge
/// settles; the shared token in `X-Webhook-Token` is the only caller
/// authentication.
#[instrument(skip(state, headers, payload), fields(txid = %payload.txid))]
pub async fn pix_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PixWebhookPayload>,
) -> Result<Json<WebhookAck>, (StatusCode, String)> {
    let expected = state
        .config
        .webhook_token
        .as_deref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "webhook disabled".to_string()))?;
    let presented = headers
        .get("x-webhook-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != expected {
        warn!("webhook token mismatch");
        return Err((StatusCode::UNAUTHORIZED, "invalid webhook token".into()));
    }

    let next = map_webhook_status(&payload.status).ok_or((
        StatusCode::BAD_REQUEST,
        format!("unknown gateway status: {}", payload.status),
    ))?;

    let tx = repo::find_by_txid(&state.db, &payload.txid)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "unknown transaction".to_string()))?;

    let current: TransactionStatus = tx.status.parse().map_err(internal)?;
    if current == next {
        // retried delivery of the same event, nothing to do
        return Ok(Json(WebhookAck { received: true }));
    }
    if !current.can_transition_to(next) {
        return Err((
            StatusCode::CONFLICT,
            format!("transaction already {current}"),
        ));
    }

    repo::set_status(&state.db, tx.id, next)
        .await
        .map_err(internal)?;
    mirror_into_order(&state, tx.order_id, next).await?;

    info!(order_id = %tx.order_id, status = %next, "pix webhook processed");
    Ok(Json(WebhookAck { received: true }))
}

/// Mirrors a settled transaction into the order record.
async fn mirror_into_order(
    state: &AppState,
    order_id: Uuid,
    settled: TransactionStatus,
) -> Result<(), (StatusCode, String)> {
    match settled {
        TransactionStatus::Paid => {
            crate::orders::repo::set_payment_result(
                &state.db,
                order_id,
                PaymentStatus::Paid,
                Some(OrderStatus::Paid),
            )
            .await
            .map_err(internal)?;
        }
        TransactionStatus::Failed | TransactionStatus::Cancelled => {
            crate::orders::repo::set_payment_result(&state.db, order_id, PaymentStatus::Failed, None)
                .await
                .map_err(internal)?;
        }
        TransactionStatus::Pending => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub order_id: Uuid,
    pub payment_status: String,
    pub transaction_status: String,
}

/// Confirmation-page poll. For a pending provider charge this also asks the
/// gateway directly, so a missed webhook delivery still settles the order.
#[instrument(skip(state))]
pub async fn payment_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<PaymentStatusResponse>, (StatusCode, String)> {
    let tx = repo::find_by_order(&state.db, order_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "transaction not found".to_string()))?;

    let mut current: TransactionStatus = tx.status.parse().map_err(internal)?;

    if current == TransactionStatus::Pending && tx.payment_gateway == "pagouai" {
        if let Some(txid) = tx.gateway_txid.as_deref() {
            let reported = state
                .gateway
                .check_status(txid)
                .await
                .and_then(|body| {
                    body.get("status")
                        .and_then(|s| s.as_str())
                        .and_then(map_webhook_status)
                });
            if let Some(next) = reported {
                if current.can_transition_to(next) {
                    repo::set_status(&state.db, tx.id, next)
                        .await
                        .map_err(internal)?;
                    mirror_into_order(&state, tx.order_id, next).await?;
                    info!(%order_id, status = %next, "payment settled via status poll");
                    current = next;
                }
            }
        }
    }

    let order = crate::orders::repo::find(&state.db, order_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "order not found".to_string()))?;

    Ok(Json(PaymentStatusResponse {
        order_id,
        payment_status: order.payment_status,
        transaction_status: current.as_str().to_string(),
    }))
}

#[instrument(skip(state, _admin))]
pub async fn list_transactions(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> Result<Json<Vec<TransactionRow>>, (StatusCode, String)> {
    let transactions = repo::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(transactions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_vocabulary_maps_to_transaction_status() {
        assert_eq!(map_webhook_status("paid"), Some(TransactionStatus::Paid));
        assert_eq!(
            map_webhook_status("CONCLUIDA"),
            Some(TransactionStatus::Paid)
        );
        assert_eq!(
            map_webhook_status("rejected"),
            Some(TransactionStatus::Failed)
        );
        assert_eq!(
            map_webhook_status("expired"),
            Some(TransactionStatus::Cancelled)
        );
        assert_eq!(map_webhook_status("whatever"), None);
    }
}
