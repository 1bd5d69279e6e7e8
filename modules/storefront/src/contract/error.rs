use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorefrontError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Insufficient stock for item {id}: available {available}, requested change {requested}")]
    InsufficientStock {
        id: i32,
        available: i32,
        requested: i32,
    },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error")]
    Internal,
}

impl StorefrontError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for StorefrontError {
    fn from(domain_error: DomainError) -> Self {
        use DomainError::*;
        match domain_error {
            StockItemNotFound { id } => Self::not_found("stock item", id),
            UserNotFound { id } => Self::not_found("user", id),
            InsufficientStock {
                id,
                available,
                requested,
            } => Self::InsufficientStock {
                id,
                available,
                requested,
            },
            Validation { field, message } => Self::validation(format!("{}: {}", field, message)),
            EmailAlreadyExists { email } => {
                Self::conflict(format!("email '{}' is already in use", email))
            }
            Persistence { .. } => Self::internal(),
        }
    }
}
