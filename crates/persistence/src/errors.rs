use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("customer {0} not found")]
    NotFound(Uuid),
    #[error("customer {id} was modified concurrently: expected version {expected}, found {actual}")]
    Conflict { id: Uuid, expected: i32, actual: i32 },
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for PersistenceError {
    fn from(e: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
            return Self::DuplicateKey(msg);
        }
        match e {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Self::StorageUnavailable(e.to_string()),
            other => Self::Db(other.to_string()),
        }
    }
}
