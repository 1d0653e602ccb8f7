use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::ProductInput;
use super::repo::{self, ProductRow};
use crate::auth::services::AuthAdmin;
use crate::error::{internal, not_found};
use crate::state::AppState;

pub fn public_router() -> Router<AppState> {
    Router::new().route("/products", get(list_products))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(admin_list_products))
        .route("/admin/products", post(create_product))
        .route("/admin/products/:id", put(update_product))
        .route("/admin/products/:id", delete(delete_product))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductRow>>, (StatusCode, String)> {
    let products = repo::list_active(&state.db).await.map_err(internal)?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn admin_list_products(
    State(state): State<AppState>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<Vec<ProductRow>>, (StatusCode, String)> {
    let products = repo::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(products))
}

#[instrument(skip(state, input))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthAdmin(admin_id): AuthAdmin,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductRow>), (StatusCode, String)> {
    let product = repo::insert(&state.db, &input).await.map_err(internal)?;
    info!(%admin_id, product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, input))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthAdmin(admin_id): AuthAdmin,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductRow>, (StatusCode, String)> {
    let product = repo::update(&state.db, id, &input)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Product"))?;
    info!(%admin_id, product_id = %id, "product updated");
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthAdmin(admin_id): AuthAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let deleted = repo::delete(&state.db, id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found("Product"));
    }
    info!(%admin_id, product_id = %id, "product deleted");
    Ok(Json(json!({ "message": "Product deleted" })))
}
