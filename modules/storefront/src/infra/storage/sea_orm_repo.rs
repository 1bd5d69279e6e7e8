//! SeaORM-backed implementations of the domain ports.
//!
//! Repositories are generic over `C: ConnectionTrait`, so the same code runs
//! against the pooled `DatabaseConnection` (single-statement reads) or an open
//! `DatabaseTransaction` (inside a unit of work).

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{BinOper, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::contract::model::{NewStockItem, NewUser, StockItem, StockItemFilter, User};
use crate::domain::repo::{
    DuplicateEmail, StockItemsRepository, UnitOfWork, UnitOfWorkFactory, UsersRepository,
};
use crate::infra::storage::entity::stock_item::{
    ActiveModel as StockItemAM, Column as StockItemColumn, Entity as StockItemEntity,
};
use crate::infra::storage::entity::user::{
    ActiveModel as UserAM, Column as UserColumn, Entity as UserEntity,
};

/// `%term%` with LIKE wildcards in the term escaped by `\`.
///
/// Case is left alone: the query folds the pattern with the same `LOWER()`
/// it applies to the column, so both sides follow the engine's case rules.
fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// `LOWER(col) LIKE LOWER(pattern) ESCAPE '\'`
fn lower_like(col: StockItemColumn, pattern: &str) -> SimpleExpr {
    let folded_pattern = SimpleExpr::Binary(
        Box::new(Func::lower(Expr::val(pattern.to_owned())).into()),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant('\\'.into())),
    );
    Expr::expr(Func::lower(Expr::col((StockItemEntity, col))))
        .binary(BinOper::Like, folded_pattern)
}

/// SeaORM stock item repository.
/// Holds a shared connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmStockItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: Arc<C>,
}

impl<C> SeaOrmStockItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> StockItemsRepository for SeaOrmStockItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<StockItem>> {
        let found = StockItemEntity::find_by_id(id)
            .one(&*self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, item: NewStockItem, at: DateTime<Utc>) -> anyhow::Result<StockItem> {
        let m = StockItemAM {
            name: Set(item.name),
            description: Set(item.description),
            cost: Set(item.cost),
            list_price: Set(item.list_price),
            quantity: Set(item.quantity),
            created_at: Set(at),
            updated_at: Set(at),
            ..Default::default()
        };
        let saved = m.insert(&*self.conn).await.context("insert failed")?;
        Ok(saved.into())
    }

    async fn update(&self, item: StockItem) -> anyhow::Result<StockItem> {
        let m = StockItemAM {
            id: Set(item.id),
            name: Set(item.name),
            description: Set(item.description),
            cost: Set(item.cost),
            list_price: Set(item.list_price),
            quantity: Set(item.quantity),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
        };
        let saved = m.update(&*self.conn).await.context("update failed")?;
        Ok(saved.into())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let res = StockItemEntity::delete_by_id(id)
            .exec(&*self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn list_filtered(&self, filter: &StockItemFilter) -> anyhow::Result<Vec<StockItem>> {
        let mut query = StockItemEntity::find();

        if let Some(term) = filter.search_term() {
            let pattern = contains_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(lower_like(StockItemColumn::Name, &pattern))
                    .add(lower_like(StockItemColumn::Description, &pattern)),
            );
        }
        if let Some(min) = filter.min_price {
            query = query.filter(StockItemColumn::ListPrice.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(StockItemColumn::ListPrice.lte(max));
        }
        if filter.in_stock {
            query = query.filter(StockItemColumn::Quantity.gt(0));
        }

        let rows = query
            .order_by_asc(StockItemColumn::Name)
            .order_by_asc(StockItemColumn::Id)
            .all(&*self.conn)
            .await
            .context("list_filtered failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<StockItem>> {
        let rows = StockItemEntity::find()
            .order_by_asc(StockItemColumn::Id)
            .all(&*self.conn)
            .await
            .context("list_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// SeaORM user repository.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: Arc<C>,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let found = UserEntity::find_by_id(id)
            .one(&*self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .count(&*self.conn)
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, user: NewUser) -> anyhow::Result<User> {
        let m = UserAM {
            name: Set(user.name),
            email: Set(user.email),
            ..Default::default()
        };
        match m.insert(&*self.conn).await {
            Ok(saved) => Ok(saved.into()),
            Err(e) if db::errors::is_unique_violation(&e) => {
                Err(anyhow::Error::new(DuplicateEmail).context(e.to_string()))
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert failed")),
        }
    }
}

/// Unit of work over one SeaORM transaction.
///
/// Both repositories share the transaction; dropping this value without
/// calling `commit` rolls the transaction back.
pub struct SeaOrmUnitOfWork {
    tx: Arc<DatabaseTransaction>,
    stock_items: SeaOrmStockItemsRepository<DatabaseTransaction>,
    users: SeaOrmUsersRepository<DatabaseTransaction>,
}

impl SeaOrmUnitOfWork {
    pub fn new(tx: DatabaseTransaction) -> Self {
        let tx = Arc::new(tx);
        Self {
            stock_items: SeaOrmStockItemsRepository::new(tx.clone()),
            users: SeaOrmUsersRepository::new(tx.clone()),
            tx,
        }
    }

    /// Take the transaction back once the repositories are gone.
    fn into_transaction(self) -> anyhow::Result<DatabaseTransaction> {
        let Self {
            tx,
            stock_items,
            users,
        } = self;
        drop(stock_items);
        drop(users);
        Arc::try_unwrap(tx).map_err(|_| anyhow::anyhow!("transaction is still shared"))
    }
}

#[async_trait::async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn stock_items(&self) -> &dyn StockItemsRepository {
        &self.stock_items
    }

    fn users(&self) -> &dyn UsersRepository {
        &self.users
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        (*self).into_transaction()?
            .commit()
            .await
            .context("commit failed")
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        (*self).into_transaction()?
            .rollback()
            .await
            .context("rollback failed")
    }
}

/// Opens [`SeaOrmUnitOfWork`]s on a pooled connection.
pub struct SeaOrmUnitOfWorkFactory {
    db: Arc<DatabaseConnection>,
    stock_items: SeaOrmStockItemsRepository<DatabaseConnection>,
    users: SeaOrmUsersRepository<DatabaseConnection>,
}

impl SeaOrmUnitOfWorkFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            stock_items: SeaOrmStockItemsRepository::new(db.clone()),
            users: SeaOrmUsersRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait::async_trait]
impl UnitOfWorkFactory for SeaOrmUnitOfWorkFactory {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        let tx = self.db.begin().await.context("begin transaction failed")?;
        Ok(Box::new(SeaOrmUnitOfWork::new(tx)))
    }

    fn stock_items(&self) -> &dyn StockItemsRepository {
        &self.stock_items
    }

    fn users(&self) -> &dyn UsersRepository {
        &self.users
    }
}
