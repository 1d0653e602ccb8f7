use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation status for customer reviews; only published ones reach the
/// storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Draft,
    Published,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "draft",
            ReviewStatus::Published => "published",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

fn default_status() -> ReviewStatus {
    ReviewStatus::Draft
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    #[serde(default)]
    pub product_id: Option<Uuid>,
    pub customer_name: String,
    pub rating: i32,
    pub comment: String,
    pub review_date: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default = "default_status")]
    pub status: ReviewStatus,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".into());
        }
        if self.customer_name.trim().is_empty() {
            return Err("customer_name is required".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(rating: i32) -> ReviewInput {
        ReviewInput {
            product_id: None,
            customer_name: "João".into(),
            rating,
            comment: "Muito bom!".into(),
            review_date: "12/08/2026".into(),
            photo_url: None,
            status: ReviewStatus::Draft,
        }
    }

    #[test]
    fn rating_bounds() {
        assert!(input(1).validate().is_ok());
        assert!(input(5).validate().is_ok());
        assert!(input(0).validate().is_err());
        assert!(input(6).validate().is_err());
    }
}
