use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, instrument, warn};

use crate::config::InventoryConfig;
use crate::contract::model::{
    NewStockItem, NewUser, StockItem, StockItemFilter, StockItemPatch, User,
};
use crate::domain::error::DomainError;
use crate::domain::fuzzy;
use crate::domain::repo::{DuplicateEmail, UnitOfWork, UnitOfWorkFactory};

const MAX_USER_FIELD_LENGTH: usize = 80;

/// Configuration for the inventory service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub fuzzy_cutoff: f64,
    pub fuzzy_max_candidates: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        InventoryConfig::default().into()
    }
}

impl From<InventoryConfig> for ServiceConfig {
    fn from(cfg: InventoryConfig) -> Self {
        Self {
            max_name_length: cfg.max_name_length,
            fuzzy_cutoff: cfg.fuzzy_cutoff,
            fuzzy_max_candidates: cfg.fuzzy_max_candidates,
        }
    }
}

/// Timestamps are kept at microsecond precision so they survive a round
/// trip through every supported backend unchanged.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Commit on success; otherwise roll back and return the original error.
async fn finish<T>(
    uow: Box<dyn UnitOfWork>,
    result: Result<T, DomainError>,
) -> Result<T, DomainError> {
    match result {
        Ok(v) => {
            uow.commit().await?;
            Ok(v)
        }
        Err(e) => {
            if let Err(rb) = uow.rollback().await {
                warn!("rollback failed: {:#}", rb);
            }
            Err(e)
        }
    }
}

/// Domain service for stock items.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct InventoryService {
    uow: Arc<dyn UnitOfWorkFactory>,
    config: ServiceConfig,
}

impl InventoryService {
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>, config: ServiceConfig) -> Self {
        Self { uow, config }
    }

    #[instrument(
        name = "storefront.service.create_stock_item",
        skip(self),
        fields(name = %new_item.name)
    )]
    pub async fn create_stock_item(&self, new_item: NewStockItem) -> Result<StockItem, DomainError> {
        info!("Creating stock item");
        self.validate_name(&new_item.name)?;
        validate_price("cost", new_item.cost)?;
        validate_price("list_price", new_item.list_price)?;
        validate_quantity(new_item.quantity)?;

        let uow = self.uow.begin().await?;
        let result = uow
            .stock_items()
            .insert(new_item, now())
            .await
            .map_err(DomainError::from);
        let item = finish(uow, result).await?;

        info!("Successfully created stock item with id={}", item.id);
        Ok(item)
    }

    #[instrument(name = "storefront.service.get_stock_item", skip(self), fields(item_id = id))]
    pub async fn get_stock_item(&self, id: i32) -> Result<Option<StockItem>, DomainError> {
        debug!("Getting stock item by id");
        Ok(self.uow.stock_items().find_by_id(id).await?)
    }

    /// Apply `patch` to an existing item. An empty patch returns the item as
    /// stored, without stamping `updated_at`.
    #[instrument(name = "storefront.service.update_stock_item", skip(self), fields(item_id = id))]
    pub async fn update_stock_item(
        &self,
        id: i32,
        patch: StockItemPatch,
    ) -> Result<Option<StockItem>, DomainError> {
        info!("Updating stock item");
        self.validate_patch(&patch)?;

        let uow = self.uow.begin().await?;
        let result = apply_patch(uow.as_ref(), id, patch).await;
        let updated = finish(uow, result).await?;

        match &updated {
            Some(_) => info!("Successfully updated stock item"),
            None => debug!("Stock item not found"),
        }
        Ok(updated)
    }

    #[instrument(name = "storefront.service.delete_stock_item", skip(self), fields(item_id = id))]
    pub async fn delete_stock_item(&self, id: i32) -> Result<bool, DomainError> {
        info!("Deleting stock item");

        let uow = self.uow.begin().await?;
        let result = uow
            .stock_items()
            .delete(id)
            .await
            .map_err(DomainError::from);
        let deleted = finish(uow, result).await?;

        if deleted {
            info!("Successfully deleted stock item");
        }
        Ok(deleted)
    }

    /// List items matching the filter, ordered by name.
    ///
    /// When a search term matches nothing, falls back to approximate matching
    /// of the term against every name and description. Fallback results come
    /// back in id order.
    #[instrument(name = "storefront.service.list_stock_items", skip(self, filter))]
    pub async fn list_stock_items(
        &self,
        filter: StockItemFilter,
    ) -> Result<Vec<StockItem>, DomainError> {
        debug!("Listing stock items");
        for (field, bound) in [("min_price", filter.min_price), ("max_price", filter.max_price)] {
            if bound.is_some_and(|v| !v.is_finite()) {
                return Err(DomainError::validation(field, "must be a finite number"));
            }
        }

        let items = self.uow.stock_items().list_filtered(&filter).await?;
        let Some(term) = filter.search_term() else {
            return Ok(items);
        };
        if !items.is_empty() {
            debug!("Found {} stock items", items.len());
            return Ok(items);
        }

        debug!(search = %term, "No direct matches, running fuzzy fallback");
        let all = self.uow.stock_items().list_all().await?;
        let matched = self.fuzzy_matches(term, all);
        let matched: Vec<StockItem> = matched.into_iter().filter(|i| filter.admits(i)).collect();
        debug!("Fuzzy fallback matched {} stock items", matched.len());
        Ok(matched)
    }

    /// Add a signed delta to an item's quantity.
    ///
    /// Reads and writes inside one unit of work but takes no row lock, so two
    /// concurrent adjustments of the same item can lose an update.
    #[instrument(
        name = "storefront.service.update_inventory",
        skip(self),
        fields(item_id = id)
    )]
    pub async fn update_inventory(
        &self,
        id: i32,
        quantity_change: i32,
    ) -> Result<Option<StockItem>, DomainError> {
        info!("Adjusting stock quantity");

        let uow = self.uow.begin().await?;
        let result = adjust_quantity(uow.as_ref(), id, quantity_change).await;
        let adjusted = finish(uow, result).await?;

        if let Some(item) = &adjusted {
            info!("Quantity is now {}", item.quantity);
        }
        Ok(adjusted)
    }

    fn fuzzy_matches(&self, term: &str, all: Vec<StockItem>) -> Vec<StockItem> {
        let (cutoff, n) = (self.config.fuzzy_cutoff, self.config.fuzzy_max_candidates);
        let close_names: HashSet<String> =
            fuzzy::close_matches(term, all.iter().map(|i| i.name.as_str()), n, cutoff)
                .into_iter()
                .collect();
        let close_descs: HashSet<String> = fuzzy::close_matches(
            term,
            all.iter().map(|i| i.description.as_deref().unwrap_or("")),
            n,
            cutoff,
        )
        .into_iter()
        .collect();

        all.into_iter()
            .filter(|item| {
                close_names.contains(&item.name)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| !d.is_empty() && close_descs.contains(d))
            })
            .collect()
    }

    // --- validation helpers ---

    fn validate_patch(&self, patch: &StockItemPatch) -> Result<(), DomainError> {
        if let Some(ref name) = patch.name {
            self.validate_name(name)?;
        }
        if let Some(cost) = patch.cost {
            validate_price("cost", cost)?;
        }
        if let Some(list_price) = patch.list_price {
            validate_price("list_price", list_price)?;
        }
        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
        }
        Ok(())
    }

    fn validate_name(&self, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        let len = name.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::validation(
                "name",
                format!(
                    "too long: {} characters (max: {})",
                    len, self.config.max_name_length
                ),
            ));
        }
        Ok(())
    }
}

async fn apply_patch(
    uow: &dyn UnitOfWork,
    id: i32,
    patch: StockItemPatch,
) -> Result<Option<StockItem>, DomainError> {
    let Some(mut current) = uow.stock_items().find_by_id(id).await? else {
        return Ok(None);
    };
    if patch.is_empty() {
        debug!("Empty patch, leaving stock item untouched");
        return Ok(Some(current));
    }

    if let Some(name) = patch.name {
        current.name = name;
    }
    if let Some(description) = patch.description {
        current.description = description;
    }
    if let Some(cost) = patch.cost {
        current.cost = cost;
    }
    if let Some(list_price) = patch.list_price {
        current.list_price = list_price;
    }
    if let Some(quantity) = patch.quantity {
        current.quantity = quantity;
    }
    current.updated_at = now();

    Ok(Some(uow.stock_items().update(current).await?))
}

async fn adjust_quantity(
    uow: &dyn UnitOfWork,
    id: i32,
    quantity_change: i32,
) -> Result<Option<StockItem>, DomainError> {
    let Some(mut current) = uow.stock_items().find_by_id(id).await? else {
        return Ok(None);
    };

    let new_quantity = current.quantity.checked_add(quantity_change).ok_or_else(|| {
        DomainError::validation("quantity_change", "resulting quantity is out of range")
    })?;
    if new_quantity < 0 {
        return Err(DomainError::insufficient_stock(
            id,
            current.quantity,
            quantity_change,
        ));
    }

    current.quantity = new_quantity;
    current.updated_at = now();
    Ok(Some(uow.stock_items().update(current).await?))
}

fn validate_price(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(
            field,
            "must be a finite, non-negative number",
        ));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity", "must not be negative"));
    }
    Ok(())
}

/// Domain service for user records.
#[derive(Clone)]
pub struct UserService {
    uow: Arc<dyn UnitOfWorkFactory>,
}

impl UserService {
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow }
    }

    #[instrument(name = "storefront.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i32) -> Result<Option<User>, DomainError> {
        debug!("Getting user by id");
        Ok(self.uow.users().find_by_id(id).await?)
    }

    #[instrument(
        name = "storefront.service.create_user",
        skip(self),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");
        validate_user_name(&new_user.name)?;
        validate_email(&new_user.email)?;

        let uow = self.uow.begin().await?;
        let result = insert_unique_user(uow.as_ref(), new_user).await;
        let user = finish(uow, result).await?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }
}

async fn insert_unique_user(uow: &dyn UnitOfWork, new_user: NewUser) -> Result<User, DomainError> {
    if uow.users().email_exists(&new_user.email).await? {
        return Err(DomainError::email_already_exists(new_user.email));
    }

    let email = new_user.email.clone();
    uow.users().insert(new_user).await.map_err(|e| {
        // A concurrent insert can still trip the UNIQUE constraint.
        if e.downcast_ref::<DuplicateEmail>().is_some() {
            DomainError::email_already_exists(email)
        } else {
            DomainError::from(e)
        }
    })
}

fn validate_user_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name", "must not be empty"));
    }
    if name.chars().count() > MAX_USER_FIELD_LENGTH {
        return Err(DomainError::validation(
            "name",
            format!("too long (max: {})", MAX_USER_FIELD_LENGTH),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() || !email.contains('@') || !email.contains('.') {
        return Err(DomainError::validation(
            "email",
            format!("invalid email format: '{}'", email),
        ));
    }
    if email.chars().count() > MAX_USER_FIELD_LENGTH {
        return Err(DomainError::validation(
            "email",
            format!("too long (max: {})", MAX_USER_FIELD_LENGTH),
        ));
    }
    Ok(())
}
