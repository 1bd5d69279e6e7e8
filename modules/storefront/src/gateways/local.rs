use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::StorefrontApi,
    error::StorefrontError,
    model::{NewStockItem, NewUser, StockItem, StockItemFilter, StockItemPatch, User},
};
use crate::domain::error::DomainError;
use crate::domain::service::{InventoryService, UserService};

/// Local implementation of the StorefrontApi trait that delegates to the domain services
pub struct StorefrontLocalClient {
    inventory: Arc<InventoryService>,
    users: Arc<UserService>,
}

impl StorefrontLocalClient {
    pub fn new(inventory: Arc<InventoryService>, users: Arc<UserService>) -> Self {
        Self { inventory, users }
    }
}

#[async_trait]
impl StorefrontApi for StorefrontLocalClient {
    async fn get_stock_item(&self, id: i32) -> Result<StockItem, StorefrontError> {
        self.inventory
            .get_stock_item(id)
            .await?
            .ok_or_else(|| DomainError::stock_item_not_found(id).into())
    }

    async fn list_stock_items(
        &self,
        filter: StockItemFilter,
    ) -> Result<Vec<StockItem>, StorefrontError> {
        self.inventory
            .list_stock_items(filter)
            .await
            .map_err(Into::into)
    }

    async fn create_stock_item(
        &self,
        new_item: NewStockItem,
    ) -> Result<StockItem, StorefrontError> {
        self.inventory
            .create_stock_item(new_item)
            .await
            .map_err(Into::into)
    }

    async fn update_stock_item(
        &self,
        id: i32,
        patch: StockItemPatch,
    ) -> Result<StockItem, StorefrontError> {
        self.inventory
            .update_stock_item(id, patch)
            .await?
            .ok_or_else(|| DomainError::stock_item_not_found(id).into())
    }

    async fn delete_stock_item(&self, id: i32) -> Result<(), StorefrontError> {
        if self.inventory.delete_stock_item(id).await? {
            Ok(())
        } else {
            Err(DomainError::stock_item_not_found(id).into())
        }
    }

    async fn adjust_quantity(
        &self,
        id: i32,
        quantity_change: i32,
    ) -> Result<StockItem, StorefrontError> {
        self.inventory
            .update_inventory(id, quantity_change)
            .await?
            .ok_or_else(|| DomainError::stock_item_not_found(id).into())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StorefrontError> {
        self.users.create_user(new_user).await.map_err(Into::into)
    }

    async fn get_user(&self, id: i32) -> Result<User, StorefrontError> {
        self.users
            .get_user(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id).into())
    }
}
