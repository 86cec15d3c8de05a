//! QueryBench Core - shared abstractions for the query workbench
//!
//! This crate provides the types that every other QueryBench crate depends on:
//!
//! - `BackendGateway` - Trait for the asynchronous execution backend
//! - `QueryRequest` / `QueryResult` - Execution request and result payloads
//! - `CompletionCatalog` - Snapshot of tables, columns and keywords used for completion
//! - `ConnectionProfile` - Stored connection parameters
//! - `QueryBenchError` - Core error type

mod catalog;
mod connection;
mod error;
mod gateway;
mod types;

pub use catalog::*;
pub use connection::*;
pub use error::*;
pub use gateway::*;
pub use types::*;
