use chrono::{DateTime, Utc};

/// Pure stock item model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq)]
pub struct StockItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub cost: f64,
    pub list_price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new stock item
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockItem {
    pub name: String,
    pub description: Option<String>,
    pub cost: f64,
    pub list_price: f64,
    pub quantity: i32,
}

/// Partial update of a stock item.
///
/// Each field is applied only when `Some`. `description: Some(None)` clears
/// the description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StockItemPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub cost: Option<f64>,
    pub list_price: Option<f64>,
    pub quantity: Option<i32>,
}

impl StockItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.cost.is_none()
            && self.list_price.is_none()
            && self.quantity.is_none()
    }
}

/// Listing criteria. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StockItemFilter {
    /// Case-insensitive substring over name or description.
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Only items with quantity > 0.
    pub in_stock: bool,
}

impl StockItemFilter {
    /// The search term, treating an empty string as no search at all.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Price and stock criteria, ignoring the search term.
    pub fn admits(&self, item: &StockItem) -> bool {
        self.min_price.map_or(true, |min| item.list_price >= min)
            && self.max_price.map_or(true, |max| item.list_price <= max)
            && (!self.in_stock || item.quantity > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
