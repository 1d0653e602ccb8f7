use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::orders::repo::OrderRow;
use crate::orders::status::{OrderStatus, PaymentMethod};
use crate::toppings::selection::ToppingCategory;

/// Immutable copy of a cart line captured at checkout; later product edits
/// must not alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToppingSnapshot {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub category: ToppingCategory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardData {
    pub number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
    #[serde(default)]
    pub brand: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_document: Option<String>,
    pub delivery_address: String,
    pub delivery_cep: String,
    pub delivery_city: String,
    pub delivery_state: String,
    #[serde(default)]
    pub delivery_complement: Option<String>,
    pub items: Vec<ProductSnapshot>,
    #[serde(default)]
    pub toppings: Vec<ToppingSnapshot>,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub card_data: Option<CardData>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
}

/// Order merged with the PIX display fields of its transaction, as shown on
/// the confirmation page.
#[derive(Debug, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: OrderRow,
    pub pix_qr_code: Option<String>,
    pub pix_qr_code_base64: Option<String>,
    pub pix_copy_paste: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
