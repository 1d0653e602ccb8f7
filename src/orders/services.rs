//! Checkout flow: validation, total recomputation, order + transaction
//! creation, and the PIX gateway fallback.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::orders::dto::{CheckoutRequest, ProductSnapshot, ToppingSnapshot};
use crate::orders::repo::{self, OrderRow};
use crate::orders::status::PaymentMethod;
use crate::payments::gateway::{PixCharge, PixChargeRequest, PixGateway};
use crate::payments::{self, pix};
use crate::state::AppState;
use crate::toppings::selection::ToppingCategory;
use crate::validators::{
    format_card_expiry, format_card_number, format_cep, format_cpf, format_phone, validate_cpf,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Precondition checks; nothing is persisted when any of these fail.
pub fn validate(req: &CheckoutRequest) -> Result<(), String> {
    if req.customer_name.trim().is_empty() {
        return Err("customer_name is required".into());
    }
    if req.customer_phone.trim().is_empty() {
        return Err("customer_phone is required".into());
    }
    if req.items.is_empty() {
        return Err("items must not be empty".into());
    }
    if req.items.iter().any(|i| i.quantity == 0) {
        return Err("item quantity must be at least 1".into());
    }

    if let Some(document) = req.customer_document.as_deref() {
        if !document.trim().is_empty() && !validate_cpf(document) {
            return Err("customer_document is not a valid CPF".into());
        }
    }

    for category in [
        ToppingCategory::Fruit,
        ToppingCategory::Topping,
        ToppingCategory::Extra,
    ] {
        let count: u32 = req
            .toppings
            .iter()
            .filter(|t| t.category == category)
            .map(|t| t.quantity)
            .sum();
        if count > category.cap() {
            return Err(format!(
                "too many {category} complements: {count} exceeds the limit of {}",
                category.cap()
            ));
        }
    }

    if req.payment_method == PaymentMethod::CreditCard {
        let Some(card) = &req.card_data else {
            return Err("card_data is required for credit card payments".into());
        };
        for (field, value) in [
            ("number", &card.number),
            ("holder_name", &card.holder_name),
            ("expiry", &card.expiry),
            ("cvv", &card.cvv),
        ] {
            if value.trim().is_empty() {
                return Err(format!("card_data.{field} is required"));
            }
        }
    }

    Ok(())
}

/// Total is the sum of every line, items and complements alike, rounded to
/// two decimal places.
pub fn compute_total(items: &[ProductSnapshot], toppings: &[ToppingSnapshot]) -> Decimal {
    let items_total: Decimal = items
        .iter()
        .map(|i| i.price * Decimal::from(i.quantity))
        .sum();
    let toppings_total: Decimal = toppings
        .iter()
        .map(|t| t.price * Decimal::from(t.quantity))
        .sum();
    (items_total + toppings_total).round_dp(2)
}

/// Tries the configured provider and degrades to the local mock charge, so
/// checkout never fails because the gateway is unreachable or unconfigured.
/// Returns the gateway label to record on the transaction.
pub async fn resolve_pix_charge(
    gateway: &dyn PixGateway,
    req: &PixChargeRequest,
) -> (&'static str, PixCharge) {
    if gateway.is_available() {
        match gateway.create_charge(req).await {
            Ok(charge) => return ("pagouai", charge),
            Err(e) => {
                warn!(order_id = %req.order_id, error = %e, "gateway charge failed, falling back to mock PIX");
            }
        }
    }
    ("mock", pix::mock_charge(req.amount))
}

/// Creates the order and exactly one transaction for it.
pub async fn place_order(
    state: &AppState,
    mut req: CheckoutRequest,
) -> Result<OrderRow, CheckoutError> {
    validate(&req).map_err(CheckoutError::Validation)?;

    // Store identifiers in their canonical display format regardless of how
    // the client sent them.
    req.customer_phone = format_phone(&req.customer_phone);
    req.delivery_cep = format_cep(&req.delivery_cep);
    if let Some(document) = req.customer_document.as_deref() {
        if !document.trim().is_empty() {
            req.customer_document = Some(format_cpf(document));
        }
    }

    let total = compute_total(&req.items, &req.toppings);
    if total != req.total_amount.round_dp(2) {
        return Err(CheckoutError::Validation(format!(
            "total_amount {} does not match the computed total {}",
            req.total_amount, total
        )));
    }

    let order = repo::insert(&state.db, &req, total).await?;

    match req.payment_method {
        PaymentMethod::Pix => {
            let charge_req = PixChargeRequest {
                amount: total,
                customer_name: req.customer_name.clone(),
                customer_email: req.customer_email.clone().unwrap_or_default(),
                customer_document: req.customer_document.clone().unwrap_or_default(),
                customer_phone: req.customer_phone.clone(),
                description: format!("Pedido Açaí Prime #{}", order.id),
                order_id: order.id,
            };
            let (gateway, charge) =
                resolve_pix_charge(state.gateway.as_ref(), &charge_req).await;
            payments::repo::insert_pix(&state.db, order.id, total, gateway, &charge).await?;
            info!(order_id = %order.id, gateway, "order placed with PIX charge");
        }
        PaymentMethod::CreditCard => {
            let card = req.card_data.as_ref().ok_or_else(|| {
                CheckoutError::Validation("card_data is required for credit card payments".into())
            })?;
            let digits: String = card.number.chars().filter(|c| c.is_ascii_digit()).collect();
            let last4 = if digits.len() >= 4 {
                Some(digits[digits.len() - 4..].to_string())
            } else {
                None
            };
            // Raw capture is an internal-trust-boundary exception for
            // presential settlement and must be opted into explicitly.
            let raw = if state.config.allow_card_capture {
                Some(serde_json::json!({
                    "number": format_card_number(&card.number),
                    "holder_name": card.holder_name,
                    "expiry": format_card_expiry(&card.expiry),
                    "cvv": card.cvv,
                }))
            } else {
                None
            };
            payments::repo::insert_card(
                &state.db,
                order.id,
                total,
                "mercadopago",
                card.brand.as_deref(),
                last4.as_deref(),
                raw.as_ref(),
            )
            .await?;
            info!(order_id = %order.id, "order placed for presential card settlement");
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PagouAiConfig;
    use crate::orders::dto::CardData;
    use crate::payments::gateway::PagouAi;
    use uuid::Uuid;

    fn snapshot(price: &str, quantity: u32) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            name: "Açaí 500ml".into(),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    fn topping_snapshot(category: ToppingCategory, quantity: u32) -> ToppingSnapshot {
        ToppingSnapshot {
            id: Uuid::new_v4(),
            name: "Morango".into(),
            price: Decimal::ZERO,
            quantity,
            category,
        }
    }

    fn checkout(payment_method: PaymentMethod) -> CheckoutRequest {
        CheckoutRequest {
            customer_name: "Maria Silva".into(),
            customer_phone: "11987654321".into(),
            customer_email: None,
            customer_document: None,
            delivery_address: "Rua das Flores, 123".into(),
            delivery_cep: "01310100".into(),
            delivery_city: "São Paulo".into(),
            delivery_state: "SP".into(),
            delivery_complement: None,
            items: vec![snapshot("18.90", 1)],
            toppings: vec![],
            total_amount: Decimal::new(1890, 2),
            payment_method,
            card_data: None,
        }
    }

    #[test]
    fn total_sums_items_and_free_toppings() {
        let items = vec![snapshot("12.90", 2), snapshot("18.90", 1)];
        let toppings = vec![
            topping_snapshot(ToppingCategory::Fruit, 1),
            topping_snapshot(ToppingCategory::Extra, 1),
        ];
        assert_eq!(compute_total(&items, &toppings), Decimal::new(4470, 2));
    }

    #[test]
    fn paid_toppings_are_carried_into_the_total() {
        let items = vec![snapshot("12.90", 1)];
        let mut extra = topping_snapshot(ToppingCategory::Extra, 2);
        extra.price = Decimal::new(150, 2);
        assert_eq!(compute_total(&items, &[extra]), Decimal::new(1590, 2));
    }

    #[test]
    fn credit_card_without_card_data_is_rejected() {
        let req = checkout(PaymentMethod::CreditCard);
        let err = validate(&req).unwrap_err();
        assert!(err.contains("card_data"));
    }

    #[test]
    fn credit_card_with_blank_field_is_rejected() {
        let mut req = checkout(PaymentMethod::CreditCard);
        req.card_data = Some(CardData {
            number: "4111111111111111".into(),
            holder_name: "MARIA SILVA".into(),
            expiry: "".into(),
            cvv: "123".into(),
            brand: None,
        });
        let err = validate(&req).unwrap_err();
        assert!(err.contains("expiry"));
    }

    #[test]
    fn pix_checkout_does_not_need_card_data() {
        let req = checkout(PaymentMethod::Pix);
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn invalid_cpf_is_rejected_when_present() {
        let mut req = checkout(PaymentMethod::Pix);
        req.customer_document = Some("11111111111".into());
        assert!(validate(&req).is_err());
        req.customer_document = Some("529.982.247-25".into());
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn overfull_topping_category_is_rejected() {
        let mut req = checkout(PaymentMethod::Pix);
        req.toppings = vec![
            topping_snapshot(ToppingCategory::Fruit, 2),
            topping_snapshot(ToppingCategory::Fruit, 1),
        ];
        let err = validate(&req).unwrap_err();
        assert!(err.contains("fruit"));
    }

    #[tokio::test]
    async fn unconfigured_gateway_falls_back_to_mock_charge() {
        let gateway = PagouAi::new(&PagouAiConfig {
            api_key: None,
            base_url: "https://api.invalid".into(),
            timeout_secs: 1,
        })
        .unwrap();

        let req = PixChargeRequest {
            amount: Decimal::new(2290, 2),
            customer_name: "Maria Silva".into(),
            customer_email: String::new(),
            customer_document: String::new(),
            customer_phone: "11987654321".into(),
            description: "Pedido".into(),
            order_id: Uuid::new_v4(),
        };
        let (label, charge) = resolve_pix_charge(&gateway, &req).await;
        assert_eq!(label, "mock");
        assert!(charge.copy_paste.contains("22.90"));
        assert!(!charge.txid.is_empty());
    }
}
