//! Error types for QueryBench

use thiserror::Error;

/// Core error type for QueryBench operations
#[derive(Error, Debug)]
pub enum QueryBenchError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for QueryBench operations
pub type Result<T> = std::result::Result<T, QueryBenchError>;
