use crate::domain::payment::PaymentId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment {0} not found")]
    NotFound(PaymentId),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid transition table: {0}")]
    InvalidTransitionTable(String),
    #[error("Event chain exceeded {0} dispatches")]
    DispatchLimitExceeded(usize),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}
