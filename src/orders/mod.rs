pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;
pub mod status;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::public_router().merge(handlers::admin_router())
}
