pub mod handlers;
pub mod repo;
pub mod selection;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::router()
}
