use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::ReviewInput;
use super::repo::{self, ReviewRow};
use crate::auth::services::AuthAdmin;
use crate::error::{internal, not_found};
use crate::state::AppState;

pub fn public_router() -> Router<AppState> {
    Router::new().route("/reviews", get(list_published))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/reviews", get(list_all).post(create_review))
        .route(
            "/admin/reviews/:id",
            put(update_review).delete(delete_review),
        )
        .route("/admin/reviews/:id/status", post(set_status))
}

#[instrument(skip(state))]
pub async fn list_published(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewRow>>, (StatusCode, String)> {
    let reviews = repo::list_published(&state.db).await.map_err(internal)?;
    Ok(Json(reviews))
}

#[instrument(skip(state, _admin))]
pub async fn list_all(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> Result<Json<Vec<ReviewRow>>, (StatusCode, String)> {
    let reviews = repo::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(reviews))
}

#[instrument(skip(state, _admin, input))]
pub async fn create_review(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(input): Json<ReviewInput>,
) -> Result<(StatusCode, Json<ReviewRow>), (StatusCode, String)> {
    input
        .validate()
        .map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    let review = repo::insert(&state.db, &input).await.map_err(internal)?;
    info!(review_id = %review.id, "review created");
    Ok((StatusCode::CREATED, Json(review)))
}

#[instrument(skip(state, _admin, input))]
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _admin: AuthAdmin,
    Json(input): Json<ReviewInput>,
) -> Result<Json<ReviewRow>, (StatusCode, String)> {
    input
        .validate()
        .map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    let review = repo::update(&state.db, id, &input)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("review"))?;
    Ok(Json(review))
}

#[derive(Debug, serde::Deserialize)]
pub struct SetStatusRequest {
    pub status: super::dto::ReviewStatus,
}

#[instrument(skip(state, _admin))]
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _admin: AuthAdmin,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<ReviewRow>, (StatusCode, String)> {
    let review = repo::set_status(&state.db, id, body.status)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("review"))?;
    info!(review_id = %id, status = %review.status, "review status updated");
    Ok(Json(review))
}

#[instrument(skip(state, _admin))]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _admin: AuthAdmin,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete(&state.db, id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found("review"));
    }
    Ok(StatusCode::NO_CONTENT)
}
