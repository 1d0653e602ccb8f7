use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod ratelimit;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::router()
}
