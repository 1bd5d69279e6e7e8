use thiserror::Error;

/// Coarse classification of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    Conflict,
    PersistenceFailure,
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Stock item not found: {id}")]
    StockItemNotFound { id: i32 },

    #[error("User not found: {id}")]
    UserNotFound { id: i32 },

    #[error("Insufficient stock for item {id}: available {available}, requested change {requested}")]
    InsufficientStock {
        id: i32,
        available: i32,
        requested: i32,
    },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl DomainError {
    pub fn stock_item_not_found(id: i32) -> Self {
        Self::StockItemNotFound { id }
    }

    pub fn user_not_found(id: i32) -> Self {
        Self::UserNotFound { id }
    }

    pub fn insufficient_stock(id: i32, available: i32, requested: i32) -> Self {
        Self::InsufficientStock {
            id,
            available,
            requested,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn email_already_exists(email: String) -> Self {
        Self::EmailAlreadyExists { email }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StockItemNotFound { .. } | Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::ValidationFailed,
            Self::InsufficientStock { .. } | Self::EmailAlreadyExists { .. } => {
                ErrorKind::Conflict
            }
            Self::Persistence { .. } => ErrorKind::PersistenceFailure,
        }
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(e: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line
        Self::persistence(format!("{:#}", e))
    }
}
