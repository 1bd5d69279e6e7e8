pub mod error;
pub mod fuzzy;
pub mod repo;
pub mod service;
