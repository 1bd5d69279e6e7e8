use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{NewStockItem, NewUser, StockItem, StockItemFilter, User};

/// Port for the domain layer: stock item persistence.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait StockItemsRepository: Send + Sync {
    /// Load a stock item by id.
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<StockItem>>;
    /// Insert a validated item stamped with `at`; the store assigns the id.
    async fn insert(&self, item: NewStockItem, at: DateTime<Utc>) -> anyhow::Result<StockItem>;
    /// Overwrite every column of an existing item (by primary key in `item.id`).
    async fn update(&self, item: StockItem) -> anyhow::Result<StockItem>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
    /// Items matching search, price and stock criteria, ordered by name then id.
    async fn list_filtered(&self, filter: &StockItemFilter) -> anyhow::Result<Vec<StockItem>>;
    /// Every item, ordered by id.
    async fn list_all(&self) -> anyhow::Result<Vec<StockItem>>;
}

/// Port for user persistence.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Insert a user; the store assigns the id.
    async fn insert(&self, user: NewUser) -> anyhow::Result<User>;
}

/// Why a user insert failed, so the service can tell constraint violations
/// apart from other storage failures.
#[derive(Debug, thiserror::Error)]
#[error("email is already registered")]
pub struct DuplicateEmail;

/// An open transaction exposing the repositories bound to it.
///
/// Nothing is visible to other connections until `commit`. Dropping the unit
/// of work without committing rolls it back.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn stock_items(&self) -> &dyn StockItemsRepository;
    fn users(&self) -> &dyn UsersRepository;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}

/// Opens units of work and serves read-only queries outside of one.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>>;
    /// Repository bound to the plain connection, for single-statement reads.
    fn stock_items(&self) -> &dyn StockItemsRepository;
    fn users(&self) -> &dyn UsersRepository;
}
