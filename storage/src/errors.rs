use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid {table} row: {reason}")]
    InvalidRow { table: &'static str, reason: String },

    #[error("{column} out of range for storage: {value}")]
    OutOfRange { column: &'static str, value: String },
}
