use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use super::repo::{self, ToppingRow};
use crate::error::internal;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/toppings", get(list_toppings))
}

#[instrument(skip(state))]
pub async fn list_toppings(
    State(state): State<AppState>,
) -> Result<Json<Vec<ToppingRow>>, (StatusCode, String)> {
    let toppings = repo::list_active(&state.db).await.map_err(internal)?;
    Ok(Json(toppings))
}
