use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CheckoutResponse, OrderDetails, UpdateOrderStatusRequest};
use super::repo::{self, OrderRow};
use super::services::{self, CheckoutError};
use super::status::OrderStatus;
use crate::auth::services::AuthAdmin;
use crate::error::{internal, not_found};
use crate::payments;
use crate::state::AppState;

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(checkout))
        .route("/orders/:id", get(get_order))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/orders", get(list_orders))
        .route("/admin/orders/:id", get(get_order_admin))
        .route("/admin/orders/:id/status", put(update_status))
}

#[instrument(skip(state, req), fields(payment_method = %req.payment_method))]
pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<super::dto::CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), (StatusCode, String)> {
    let order = services::place_order(&state, req).await.map_err(|e| match e {
        CheckoutError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        CheckoutError::Internal(e) => internal(e),
    })?;
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse { order_id: order.id }),
    ))
}

async fn load_details(
    state: &AppState,
    id: Uuid,
) -> Result<OrderDetails, (StatusCode, String)> {
    let order = repo::find(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("order"))?;
    let tx = payments::repo::find_by_order(&state.db, id)
        .await
        .map_err(internal)?;

    let (pix_qr_code, pix_qr_code_base64, pix_copy_paste) = match tx {
        Some(tx) => (tx.pix_qr_code, tx.pix_qr_code_base64, tx.pix_copy_paste),
        None => (None, None, None),
    };

    Ok(OrderDetails {
        order,
        pix_qr_code,
        pix_qr_code_base64,
        pix_copy_paste,
    })
}

#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetails>, (StatusCode, String)> {
    Ok(Json(load_details(&state, id).await?))
}

#[instrument(skip(state, _admin))]
pub async fn get_order_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _admin: AuthAdmin,
) -> Result<Json<OrderDetails>, (StatusCode, String)> {
    Ok(Json(load_details(&state, id).await?))
}

#[instrument(skip(state, _admin))]
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> Result<Json<Vec<OrderRow>>, (StatusCode, String)> {
    let orders = repo::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(orders))
}

#[instrument(skip(state, _admin))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _admin: AuthAdmin,
    Json(body): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderRow>, (StatusCode, String)> {
    let order = repo::find(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("order"))?;

    let current: OrderStatus = order.status.parse().map_err(internal)?;
    if !current.can_transition_to(body.status) {
        return Err((
            StatusCode::CONFLICT,
            format!("cannot move order from {current} to {}", body.status),
        ));
    }

    repo::set_status(&state.db, id, body.status)
        .await
        .map_err(internal)?;
    info!(order_id = %id, from = %current, to = %body.status, "order status updated");

    let updated = repo::find(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("order"))?;
    Ok(Json(updated))
}
