//! Shared database error helpers (SQLSTATE categorization, etc.)

use sea_orm::{DbErr, SqlErr};

/// Returns true if the given SQLSTATE code represents a unique constraint violation
/// across the supported backends (Postgres 23505, SQLite 2067).
pub fn is_unique_violation_code(code: &str) -> bool {
    matches!(code, "23505" | "2067")
}

/// Returns true if a SeaORM error was caused by a UNIQUE constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    // Drivers that do not surface a structured error still carry the code in the message.
    let msg = err.to_string();
    msg.contains("UNIQUE constraint failed") || is_unique_violation_code(msg.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_unique_codes() {
        assert!(is_unique_violation_code("23505"));
        assert!(is_unique_violation_code("2067"));
        assert!(!is_unique_violation_code("23503"));
    }

    #[test]
    fn plain_errors_are_not_unique_violations() {
        let err = DbErr::RecordNotFound("stock_items".into());
        assert!(!is_unique_violation(&err));
    }
}
