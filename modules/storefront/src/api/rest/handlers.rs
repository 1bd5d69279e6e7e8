use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    AdjustQuantityReq, CreateStockItemReq, CreateUserReq, ListStockItemsQuery, StockItemDto,
    StockItemListDto, UpdateStockItemReq, UserDto,
};
use crate::api::rest::error::{
    bad_request, map_domain_error, stock_item_not_found, user_not_found,
};
use crate::api::rest::problem::ProblemResponse;
use crate::api::rest::routes::ApiDoc;
use crate::domain::service::{InventoryService, UserService};

/// List stock items, filtered by the query string
pub async fn list_stock_items(
    Extension(svc): Extension<Arc<InventoryService>>,
    uri: Uri,
    query: Result<Query<ListStockItemsQuery>, QueryRejection>,
) -> Result<Json<StockItemListDto>, ProblemResponse> {
    let Query(query) = query.map_err(|r| bad_request(r.body_text(), uri.path()))?;
    info!("Listing stock items with query: {:?}", query);

    match svc.list_stock_items(query.into()).await {
        Ok(items) => {
            let items: Vec<StockItemDto> = items.into_iter().map(StockItemDto::from).collect();
            Ok(Json(StockItemListDto {
                total: items.len(),
                items,
            }))
        }
        Err(e) => {
            error!("Failed to list stock items: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific stock item by ID
pub async fn get_stock_item(
    Extension(svc): Extension<Arc<InventoryService>>,
    Path(id): Path<i32>,
    uri: Uri,
) -> Result<Json<StockItemDto>, ProblemResponse> {
    info!("Getting stock item with id: {}", id);

    match svc.get_stock_item(id).await {
        Ok(Some(item)) => Ok(Json(StockItemDto::from(item))),
        Ok(None) => Err(stock_item_not_found(id, uri.path())),
        Err(e) => {
            error!("Failed to get stock item {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a new stock item
pub async fn create_stock_item(
    uri: Uri,
    Extension(svc): Extension<Arc<InventoryService>>,
    req_body: Result<Json<CreateStockItemReq>, JsonRejection>,
) -> Result<(StatusCode, Json<StockItemDto>), ProblemResponse> {
    let Json(req_body) = req_body.map_err(|r| bad_request(r.body_text(), uri.path()))?;
    info!("Creating stock item: {:?}", req_body);

    match svc.create_stock_item(req_body.into()).await {
        Ok(item) => Ok((StatusCode::CREATED, Json(StockItemDto::from(item)))),
        Err(e) => {
            error!("Failed to create stock item: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update an existing stock item
pub async fn update_stock_item(
    uri: Uri,
    Extension(svc): Extension<Arc<InventoryService>>,
    Path(id): Path<i32>,
    req_body: Result<Json<UpdateStockItemReq>, JsonRejection>,
) -> Result<Json<StockItemDto>, ProblemResponse> {
    let Json(req_body) = req_body.map_err(|r| bad_request(r.body_text(), uri.path()))?;
    info!("Updating stock item {} with: {:?}", id, req_body);

    match svc.update_stock_item(id, req_body.into()).await {
        Ok(Some(item)) => Ok(Json(StockItemDto::from(item))),
        Ok(None) => Err(stock_item_not_found(id, uri.path())),
        Err(e) => {
            error!("Failed to update stock item {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a stock item by ID
pub async fn delete_stock_item(
    Extension(svc): Extension<Arc<InventoryService>>,
    Path(id): Path<i32>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting stock item: {}", id);

    match svc.delete_stock_item(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(stock_item_not_found(id, uri.path())),
        Err(e) => {
            error!("Failed to delete stock item {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Apply a signed quantity delta to a stock item
pub async fn adjust_quantity(
    uri: Uri,
    Extension(svc): Extension<Arc<InventoryService>>,
    Path(id): Path<i32>,
    req_body: Result<Json<AdjustQuantityReq>, JsonRejection>,
) -> Result<Json<StockItemDto>, ProblemResponse> {
    let Json(req_body) = req_body.map_err(|r| bad_request(r.body_text(), uri.path()))?;
    info!(
        "Adjusting stock item {} by {}",
        id, req_body.quantity_change
    );

    match svc.update_inventory(id, req_body.quantity_change).await {
        Ok(Some(item)) => Ok(Json(StockItemDto::from(item))),
        Ok(None) => Err(stock_item_not_found(id, uri.path())),
        Err(e) => {
            error!("Failed to adjust stock item {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a new user
pub async fn create_user(
    uri: Uri,
    Extension(svc): Extension<Arc<UserService>>,
    req_body: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    let Json(req_body) = req_body.map_err(|r| bad_request(r.body_text(), uri.path()))?;
    info!("Creating user: {:?}", req_body);

    match svc.create_user(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific user by ID
pub async fn get_user(
    Extension(svc): Extension<Arc<UserService>>,
    Path(id): Path<i32>,
    uri: Uri,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(Some(user)) => Ok(Json(UserDto::from(user))),
        Ok(None) => Err(user_not_found(id, uri.path())),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// OpenAPI document with the component schemas of this API
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
