use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::auth::dto::{LoginRequest, LoginResponse, PublicAdmin};
use crate::auth::repo_types::AdminUser;
use crate::auth::services::{is_valid_email, verify_password, AuthAdmin, JwtKeys};
use crate::error::internal;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/me", get(me))
}

/// Rate-limit key: proxy-forwarded address when present, else the socket
/// peer.
fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string())
}

#[instrument(skip(state, headers, payload))]
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let ip = client_ip(&headers, &addr);
    if !state.login_attempts.check(&ip) {
        warn!(%ip, "login rate limit reached");
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Too many attempts, try again in 15 minutes".into(),
        ));
    }

    payload.email = payload.email.trim().to_lowercase();
    if !is_valid_email(&payload.email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let user = match AdminUser::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            state.login_attempts.record_failure(&ip);
            warn!(email = %payload.email, "login unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => return Err(internal(e)),
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(internal)?;
    if !ok {
        state.login_attempts.record_failure(&ip);
        warn!(email = %payload.email, admin_id = %user.id, "login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    state.login_attempts.clear(&ip);

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(internal)?;

    info!(admin_id = %user.id, email = %user.email, "admin logged in");
    Ok(Json(LoginResponse {
        token,
        user: PublicAdmin {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    }))
}

/// Tokens are stateless; logout exists for client parity.
pub async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "message": "logged out" }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthAdmin(admin_id): AuthAdmin,
) -> Result<Json<PublicAdmin>, (StatusCode, String)> {
    let user = AdminUser::find_by_id(&state.db, admin_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(PublicAdmin {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_header_wins_over_socket_addr() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        assert_eq!(client_ip(&headers, &addr), "203.0.113.7");
        assert_eq!(client_ip(&HeaderMap::new(), &addr), "127.0.0.1");
    }
}
