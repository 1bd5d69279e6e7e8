pub mod client;
pub mod error;
pub mod model;

pub use error::StorefrontError;
pub use model::{
    NewStockItem, NewUser, StockItem, StockItemFilter, StockItemPatch, User,
};
