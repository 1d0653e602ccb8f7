pub mod gateway;
pub mod handlers;
pub mod pix;
pub mod repo;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::router()
}
