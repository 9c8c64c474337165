//! Point-of-sale ledger.

use serde::{Deserialize, Serialize};

use crate::id::ProductId;

/// A catalog entry. Catalogs are static and only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the smallest currency unit.
    pub price: u64,
    #[serde(default)]
    pub category: String,
}

/// One product line in a cart. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

impl LineItem {
    pub fn subtotal(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Summary of a completed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub total: u64,
    pub line_count: usize,
    pub units: u32,
}

/// Ordered line items keyed by product. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`. Returns the line's new quantity.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.items.push(LineItem {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
        });
        1
    }

    /// Remove the whole line for `id`, if present.
    pub fn remove_item(&mut self, id: ProductId) -> Option<LineItem> {
        let pos = self.items.iter().position(|l| l.product_id == id)?;
        Some(self.items.remove(pos))
    }

    /// Sum of `unit_price * quantity`, computed on every call.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.subtotal()))
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn units(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|l| l.product_id == id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Empty the cart in one step and summarize what was in it.
    pub fn checkout(&mut self) -> Receipt {
        let receipt = Receipt {
            total: self.total(),
            line_count: self.items.len(),
            units: self.units(),
        };
        self.items.clear();
        receipt
    }
}
