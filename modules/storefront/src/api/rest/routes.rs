use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    AdjustQuantityReq, CreateStockItemReq, CreateUserReq, StockItemDto, StockItemListDto,
    UpdateStockItemReq, UserDto,
};
use crate::api::rest::handlers;
use crate::api::rest::problem::Problem;
use crate::domain::service::{InventoryService, UserService};

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API"),
    components(schemas(
        StockItemDto,
        StockItemListDto,
        CreateStockItemReq,
        UpdateStockItemReq,
        AdjustQuantityReq,
        UserDto,
        CreateUserReq,
        Problem
    ))
)]
pub struct ApiDoc;

/// Mount the storefront routes on `router`.
pub fn register_routes(
    router: Router,
    inventory: Arc<InventoryService>,
    users: Arc<UserService>,
) -> Router {
    router
        .route(
            "/stock-items",
            get(handlers::list_stock_items).post(handlers::create_stock_item),
        )
        .route(
            "/stock-items/{id}",
            get(handlers::get_stock_item)
                .patch(handlers::update_stock_item)
                .delete(handlers::delete_stock_item),
        )
        .route(
            "/stock-items/{id}/adjustments",
            post(handlers::adjust_quantity),
        )
        .route("/users", post(handlers::create_user))
        .route("/users/{id}", get(handlers::get_user))
        .route("/openapi.json", get(handlers::openapi_json))
        .layer(Extension(inventory))
        .layer(Extension(users))
}
