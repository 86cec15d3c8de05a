//! QueryBench Drivers - backend gateway implementations
//!
//! Implements [`querybench_core::BackendGateway`] for MySQL and MariaDB
//! servers using `mysql_async`.

mod mysql;
mod sql;
mod values;

pub use mysql::MySqlGateway;
pub use sql::{SYSTEM_DATABASES, is_system_database, paginated_sql, quote_identifier, use_database_sql};
pub use values::mysql_value_to_json;
