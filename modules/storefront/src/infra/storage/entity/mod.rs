pub mod stock_item;
pub mod user;
