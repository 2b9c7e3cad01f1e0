pub mod manager;
pub mod models;

pub use manager::{DatabaseError, DatabaseManager};

/// True when the error is a Postgres unique-constraint violation
/// (SQLSTATE 23505). Services use this to turn racing inserts into
/// domain conflicts instead of 500s.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
