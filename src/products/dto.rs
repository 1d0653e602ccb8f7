use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;

fn default_stock() -> i32 {
    999
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub size: String,
    pub image: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_stock")]
    pub stock: i32,
    #[serde(default)]
    pub promo_badge: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub promo_end_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub highlight_order: i32,
}
