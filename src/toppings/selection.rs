//! Topping customization rules.
//!
//! A selection is the transient pre-checkout set of complements. Caps are
//! enforced when an item is added, so the set can never hold more than the
//! per-category allowance (fruit 2, topping 1, extra 4). Prices are carried
//! through even though current complements are free.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToppingCategory {
    Fruit,
    Topping,
    Extra,
}

impl ToppingCategory {
    /// Maximum total quantity allowed per category.
    pub fn cap(&self) -> u32 {
        match self {
            ToppingCategory::Fruit => 2,
            ToppingCategory::Topping => 1,
            ToppingCategory::Extra => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToppingCategory::Fruit => "fruit",
            ToppingCategory::Topping => "topping",
            ToppingCategory::Extra => "extra",
        }
    }
}

impl fmt::Display for ToppingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToppingCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fruit" => Ok(ToppingCategory::Fruit),
            "topping" => Ok(ToppingCategory::Topping),
            "extra" => Ok(ToppingCategory::Extra),
            other => anyhow::bail!("unknown topping category: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTopping {
    pub id: Uuid,
    pub name: String,
    pub category: ToppingCategory,
    pub price: Decimal,
    pub quantity: u32,
}

/// Pre-order selection set, keyed by topping id.
#[derive(Debug, Default, Clone)]
pub struct ToppingSelection {
    items: BTreeMap<Uuid, SelectedTopping>,
}

impl ToppingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles a topping: deselects it when present, otherwise adds it with
    /// quantity 1. Returns `false` when the category cap rejects the add.
    pub fn select(&mut self, topping: SelectedTopping) -> bool {
        if self.items.remove(&topping.id).is_some() {
            return true;
        }
        if self.category_count(topping.category) >= topping.category.cap() {
            return false;
        }
        self.items.insert(
            topping.id,
            SelectedTopping {
                quantity: 1,
                ..topping
            },
        );
        true
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.items.contains_key(&id)
    }

    pub fn category_count(&self, category: ToppingCategory) -> u32 {
        self.items
            .values()
            .filter(|t| t.category == category)
            .map(|t| t.quantity)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &SelectedTopping> {
        self.items.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topping(name: &str, category: ToppingCategory) -> SelectedTopping {
        SelectedTopping {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            price: Decimal::ZERO,
            quantity: 1,
        }
    }

    #[test]
    fn third_fruit_is_rejected() {
        let mut selection = ToppingSelection::new();
        let morango = topping("Morango", ToppingCategory::Fruit);
        let banana = topping("Banana", ToppingCategory::Fruit);
        let kiwi = topping("Kiwi", ToppingCategory::Fruit);

        assert!(selection.select(morango.clone()));
        assert!(selection.select(banana.clone()));
        assert!(!selection.select(kiwi.clone()));

        assert_eq!(selection.category_count(ToppingCategory::Fruit), 2);
        assert!(selection.is_selected(morango.id));
        assert!(selection.is_selected(banana.id));
        assert!(!selection.is_selected(kiwi.id));
    }

    #[test]
    fn deselecting_frees_a_slot() {
        let mut selection = ToppingSelection::new();
        let morango = topping("Morango", ToppingCategory::Fruit);
        let banana = topping("Banana", ToppingCategory::Fruit);
        let kiwi = topping("Kiwi", ToppingCategory::Fruit);

        assert!(selection.select(morango.clone()));
        assert!(selection.select(banana.clone()));
        // toggle off, then the rejected one fits
        assert!(selection.select(morango.clone()));
        assert!(!selection.is_selected(morango.id));
        assert!(selection.select(kiwi.clone()));
        assert_eq!(selection.category_count(ToppingCategory::Fruit), 2);
    }

    #[test]
    fn caps_are_independent_per_category() {
        let mut selection = ToppingSelection::new();
        assert!(selection.select(topping("Granola", ToppingCategory::Topping)));
        assert!(!selection.select(topping("Chocolate", ToppingCategory::Topping)));

        for name in ["Leite Condensado", "Mel", "Paçoca", "Granulado"] {
            assert!(selection.select(topping(name, ToppingCategory::Extra)));
        }
        assert!(!selection.select(topping("Nutella", ToppingCategory::Extra)));

        assert_eq!(selection.category_count(ToppingCategory::Topping), 1);
        assert_eq!(selection.category_count(ToppingCategory::Extra), 4);
        assert_eq!(selection.category_count(ToppingCategory::Fruit), 0);
    }
}
