use async_trait::async_trait;

use crate::contract::{
    error::StorefrontError,
    model::{NewStockItem, NewUser, StockItem, StockItemFilter, StockItemPatch, User},
};

/// Public API trait for the storefront module that other modules can use
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Get a stock item by ID
    async fn get_stock_item(&self, id: i32) -> Result<StockItem, StorefrontError>;

    /// List stock items matching the filter (with fuzzy fallback on search)
    async fn list_stock_items(
        &self,
        filter: StockItemFilter,
    ) -> Result<Vec<StockItem>, StorefrontError>;

    /// Create a new stock item
    async fn create_stock_item(&self, new_item: NewStockItem)
        -> Result<StockItem, StorefrontError>;

    /// Update a stock item with partial data
    async fn update_stock_item(
        &self,
        id: i32,
        patch: StockItemPatch,
    ) -> Result<StockItem, StorefrontError>;

    /// Delete a stock item by ID
    async fn delete_stock_item(&self, id: i32) -> Result<(), StorefrontError>;

    /// Apply a signed quantity delta
    async fn adjust_quantity(
        &self,
        id: i32,
        quantity_change: i32,
    ) -> Result<StockItem, StorefrontError>;

    /// Create a user
    async fn create_user(&self, new_user: NewUser) -> Result<User, StorefrontError>;

    /// Get a user by ID
    async fn get_user(&self, id: i32) -> Result<User, StorefrontError>;
}
