use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{
    NewStockItem, NewUser, StockItem, StockItemFilter, StockItemPatch, User,
};

/// REST DTO for stock item representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockItemDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub cost: f64,
    pub list_price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating a new stock item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateStockItemReq {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cost: f64,
    pub list_price: f64,
    #[serde(default)]
    pub quantity: i32,
}

/// REST DTO for updating a stock item (partial).
///
/// Absent fields are left alone; `"description": null` clears the description.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateStockItemReq {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub cost: Option<f64>,
    pub list_price: Option<f64>,
    pub quantity: Option<i32>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// REST DTO for a quantity adjustment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AdjustQuantityReq {
    /// Signed delta added to the current quantity.
    pub quantity_change: i32,
}

/// REST DTO for stock item list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockItemListDto {
    pub items: Vec<StockItemDto>,
    pub total: usize,
}

/// REST DTO for list query parameters
#[derive(Debug, Clone, Deserialize, ToSchema, Default)]
pub struct ListStockItemsQuery {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(default)]
    pub in_stock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub name: String,
    pub email: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<StockItem> for StockItemDto {
    fn from(item: StockItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            cost: item.cost,
            list_price: item.list_price,
            quantity: item.quantity,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<CreateStockItemReq> for NewStockItem {
    fn from(req: CreateStockItemReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            cost: req.cost,
            list_price: req.list_price,
            quantity: req.quantity,
        }
    }
}

impl From<UpdateStockItemReq> for StockItemPatch {
    fn from(req: UpdateStockItemReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            cost: req.cost,
            list_price: req.list_price,
            quantity: req.quantity,
        }
    }
}

impl From<ListStockItemsQuery> for StockItemFilter {
    fn from(q: ListStockItemsQuery) -> Self {
        Self {
            search: q.search,
            min_price: q.min_price,
            max_price: q.max_price,
            in_stock: q.in_stock,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_from_absent_description() {
        let absent: UpdateStockItemReq = serde_json::from_str(r#"{"name":"Bolt"}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateStockItemReq =
            serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateStockItemReq =
            serde_json::from_str(r#"{"description":"zinc plated"}"#).unwrap();
        assert_eq!(set.description, Some(Some("zinc plated".to_string())));
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let err = serde_json::from_str::<UpdateStockItemReq>(r#"{"id":5}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));

        let err =
            serde_json::from_str::<UpdateStockItemReq>(r#"{"created_at":"2024-01-01T00:00:00Z"}"#)
                .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn create_defaults_quantity_to_zero() {
        let req: CreateStockItemReq =
            serde_json::from_str(r#"{"name":"Nut","cost":0.1,"list_price":0.25}"#).unwrap();
        let new_item = NewStockItem::from(req);
        assert_eq!(new_item.quantity, 0);
        assert_eq!(new_item.description, None);
    }
}
