//! Development seed routes. They bootstrap a fresh database with the
//! storefront catalogue and the first admin account, and refuse to run in
//! production.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::auth::repo_types::AdminUser;
use crate::auth::services::hash_password;
use crate::error::internal;
use crate::products::dto::ProductInput;
use crate::state::AppState;
use crate::toppings;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seed-products", post(seed_products))
        .route("/seed-toppings", post(seed_toppings))
        .route("/seed-admin", post(seed_admin))
}

fn guard_production(state: &AppState) -> Result<(), (StatusCode, String)> {
    if state.config.production {
        return Err((
            StatusCode::FORBIDDEN,
            "seed routes are disabled in production".to_string(),
        ));
    }
    Ok(())
}

fn product(name: &str, description: &str, price: &str, size: &str, highlight: i32) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: description.to_string(),
        price: price.parse().unwrap_or_default(),
        size: size.to_string(),
        image: format!("/attached_assets/{}.webp", size),
        is_active: true,
        stock: 999,
        promo_badge: None,
        promo_end_at: None,
        highlight_order: highlight,
    }
}

#[instrument(skip(state))]
pub async fn seed_products(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, String)> {
    guard_production(&state)?;

    let catalogue = [
        product(
            "Açaí 300ml",
            "Açaí batido na hora com até 3 acompanhamentos inclusos.",
            "12.90",
            "300ml",
            1,
        ),
        product(
            "Açaí 500ml",
            "Açaí batido na hora com até 5 acompanhamentos inclusos.",
            "18.90",
            "500ml",
            2,
        ),
        product(
            "Combo Duo",
            "Dois açaís de 400ml para compartilhar, acompanhamentos à escolha.",
            "22.90",
            "2x400ml",
            3,
        ),
    ];

    let mut created = 0;
    for input in &catalogue {
        crate::products::repo::insert(&state.db, input)
            .await
            .map_err(internal)?;
        created += 1;
    }
    info!(created, "products seeded");
    Ok(Json(json!({ "created": created })))
}

/// Starter complements; all free, matching the storefront's included-topping
/// pricing.
fn topping_catalogue() -> [(&'static str, &'static str, Decimal, i32); 6] {
    let free = Decimal::ZERO;
    [
        ("Morango", "fruit", free, 1),
        ("Banana", "fruit", free, 2),
        ("Kiwi", "fruit", free, 3),
        ("Granola", "topping", free, 1),
        ("Chocolate", "topping", free, 2),
        ("Leite Condensado", "extra", free, 1),
    ]
}

#[instrument(skip(state))]
pub async fn seed_toppings(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, String)> {
    guard_production(&state)?;

    let mut created = 0;
    for (name, category, price, display_order) in topping_catalogue() {
        toppings::repo::insert(&state.db, name, category, price, display_order)
            .await
            .map_err(internal)?;
        created += 1;
    }
    info!(created, "toppings seeded");
    Ok(Json(json!({ "created": created })))
}

#[instrument(skip(state))]
pub async fn seed_admin(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, String)> {
    guard_production(&state)?;

    let email = "admin@acaiprime.com";
    if AdminUser::find_by_email(&state.db, email)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Ok(Json(json!({ "created": false, "email": email })));
    }

    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let hash = hash_password(&password).map_err(internal)?;
    let user = AdminUser::create(&state.db, email, &hash, "Administrador", "admin")
        .await
        .map_err(internal)?;
    info!(admin_id = %user.id, "admin account seeded");
    Ok(Json(json!({ "created": true, "email": email })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_toppings_are_all_free() {
        for (name, _, price, _) in topping_catalogue() {
            assert_eq!(price, Decimal::ZERO, "{name} must seed at 0.00");
        }
    }
}
