//! MySQL backend gateway

use async_trait::async_trait;
use mysql_async::{
    Column, Conn, Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts, Row as MySqlRow,
    consts::ColumnType, prelude::*,
};
use parking_lot::{Mutex, RwLock};
use querybench_core::{
    BackendGateway, CompletionCatalog, ConnectionProfile, QueryBenchError, QueryRequest,
    QueryResult, Result,
};
use std::collections::HashMap;
use std::time::Instant;

use crate::sql::{is_system_database, paginated_sql, use_database_sql};
use crate::values::mysql_value_to_json;

const TABLES_QUERY: &str = "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME";

const COLUMNS_QUERY: &str = "SELECT TABLE_NAME, COLUMN_NAME FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_SCHEMA = ? ORDER BY TABLE_NAME, ORDINAL_POSITION";

const MAX_POOL_CONNECTIONS: usize = 5;

/// Gateway that runs requests against registered MySQL connection profiles.
///
/// One pool per profile is opened on first use and kept until
/// [`MySqlGateway::disconnect_all`].
#[derive(Default)]
pub struct MySqlGateway {
    profiles: RwLock<HashMap<String, ConnectionProfile>>,
    pools: Mutex<HashMap<String, Pool>>,
}

impl MySqlGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = ConnectionProfile>) -> Self {
        let gateway = Self::new();
        for profile in profiles {
            gateway.register(profile);
        }
        gateway
    }

    /// Add or replace a profile. A replaced profile's pool is dropped so the
    /// next request reconnects with the new parameters.
    pub fn register(&self, profile: ConnectionProfile) {
        tracing::info!(connection_id = %profile.id, host = %profile.host, port = profile.port, "registering connection profile");
        self.pools.lock().remove(&profile.id);
        self.profiles.write().insert(profile.id.clone(), profile);
    }

    pub fn profile(&self, connection_id: &str) -> Option<ConnectionProfile> {
        self.profiles.read().get(connection_id).cloned()
    }

    /// Registered profile ids, sorted
    pub fn connection_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.profiles.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Close every open pool
    pub async fn disconnect_all(&self) {
        let pools: Vec<(String, Pool)> = self.pools.lock().drain().collect();
        for (connection_id, pool) in pools {
            if let Err(e) = pool.disconnect().await {
                tracing::warn!(connection_id = %connection_id, error = %e, "failed to close MySQL pool");
            } else {
                tracing::debug!(connection_id = %connection_id, "MySQL pool closed");
            }
        }
    }

    fn pool_for(&self, connection_id: &str) -> Result<Pool> {
        if let Some(pool) = self.pools.lock().get(connection_id) {
            return Ok(pool.clone());
        }

        let profile = self.profile(connection_id).ok_or_else(|| {
            QueryBenchError::NotFound(format!("Connection '{}' not found", connection_id))
        })?;
        let pool = Pool::new(pool_opts(&profile)?);
        tracing::info!(
            connection_id = %connection_id,
            host = %profile.host,
            port = profile.port,
            database = ?profile.database,
            "opened MySQL pool"
        );

        // Another caller may have raced us here; keep whichever pool landed first.
        let pool = self
            .pools
            .lock()
            .entry(connection_id.to_string())
            .or_insert(pool)
            .clone();
        Ok(pool)
    }

    async fn get_conn(&self, connection_id: &str) -> Result<Conn> {
        let pool = self.pool_for(connection_id)?;
        pool.get_conn()
            .await
            .map_err(|e| QueryBenchError::Connection(format!("Failed to connect to MySQL: {}", e)))
    }
}

fn pool_opts(profile: &ConnectionProfile) -> Result<Opts> {
    let constraints = PoolConstraints::new(1, MAX_POOL_CONNECTIONS).ok_or_else(|| {
        QueryBenchError::Connection(format!(
            "Failed to configure MySQL pool constraints (min=1, max={})",
            MAX_POOL_CONNECTIONS
        ))
    })?;

    let mut builder = OptsBuilder::from_opts(Opts::default())
        .ip_or_hostname(profile.host.clone())
        .tcp_port(profile.port)
        .user(Some(profile.username.clone()))
        .pool_opts(PoolOpts::default().with_constraints(constraints));

    if !profile.password.is_empty() {
        builder = builder.pass(Some(profile.password.clone()));
    }
    if let Some(database) = &profile.database {
        builder = builder.db_name(Some(database.clone()));
    }

    Ok(builder.into())
}

/// Build a catalog from base tables and `(table, column)` pairs.
///
/// Columns of tables that are not in `tables` (views) are ignored.
pub(crate) fn build_catalog(tables: Vec<String>, columns: Vec<(String, String)>) -> CompletionCatalog {
    let mut by_table: HashMap<String, Vec<String>> =
        tables.iter().map(|table| (table.clone(), Vec::new())).collect();
    for (table, column) in columns {
        if let Some(table_columns) = by_table.get_mut(&table) {
            table_columns.push(column);
        }
    }

    CompletionCatalog::from_tables(tables.into_iter().map(|table| {
        let columns = by_table.remove(&table).unwrap_or_default();
        (table, columns)
    }))
}

/// Column names and types from result-set metadata, present even when no rows came back
fn column_metadata(columns: &[Column]) -> (Vec<String>, Vec<ColumnType>) {
    columns
        .iter()
        .map(|column| (column.name_str().to_string(), column.column_type()))
        .unzip()
}

fn rows_to_result(columns: &[Column], rows: Vec<MySqlRow>, execution_time_ms: u64) -> QueryResult {
    let (columns, column_types) = column_metadata(columns);

    let rows: Vec<Vec<serde_json::Value>> = rows
        .into_iter()
        .map(|mut row| {
            column_types
                .iter()
                .enumerate()
                .map(|(idx, column_type)| {
                    let value = row.take(idx).unwrap_or(mysql_async::Value::NULL);
                    mysql_value_to_json(value, *column_type)
                })
                .collect()
        })
        .collect();

    QueryResult {
        columns,
        total_rows: rows.len(),
        rows,
        execution_time_ms,
    }
}

#[async_trait]
impl BackendGateway for MySqlGateway {
    #[tracing::instrument(skip(self, request), fields(connection_id = %request.connection_id, sql_preview = %request.sql_preview()))]
    async fn execute(&self, request: &QueryRequest) -> Result<QueryResult> {
        let mut conn = self.get_conn(&request.connection_id).await?;

        if let Some(database) = &request.database {
            conn.query_drop(&use_database_sql(database))
                .await
                .map_err(|e| QueryBenchError::Query(e.to_string()))?;
        }

        let sql = match request.pagination() {
            Some((page, page_size)) => paginated_sql(&request.sql, page, page_size),
            None => request.sql.clone(),
        };

        let start_time = Instant::now();
        let mut query_result = conn
            .query_iter(&sql)
            .await
            .map_err(|e| QueryBenchError::Query(e.to_string()))?;
        let columns = query_result.columns().unwrap_or_else(|| Vec::<Column>::new().into());
        let rows: Vec<MySqlRow> = query_result
            .collect()
            .await
            .map_err(|e| QueryBenchError::Query(e.to_string()))?;
        query_result
            .drop_result()
            .await
            .map_err(|e| QueryBenchError::Query(e.to_string()))?;
        let execution_time_ms = start_time.elapsed().as_millis() as u64;

        let result = rows_to_result(&columns, rows, execution_time_ms);
        tracing::debug!(
            row_count = result.total_rows,
            execution_time_ms = execution_time_ms,
            "query executed successfully"
        );
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_completion_catalog(
        &self,
        connection_id: &str,
        database: &str,
    ) -> Result<CompletionCatalog> {
        let mut conn = self.get_conn(connection_id).await?;

        let tables: Vec<String> = conn
            .exec(TABLES_QUERY, (database.to_string(),))
            .await
            .map_err(|e| QueryBenchError::Schema(format!("Failed to list tables: {}", e)))?;
        let columns: Vec<(String, String)> = conn
            .exec(COLUMNS_QUERY, (database.to_string(),))
            .await
            .map_err(|e| QueryBenchError::Schema(format!("Failed to list columns: {}", e)))?;

        let catalog = build_catalog(tables, columns);
        tracing::debug!(
            tables = catalog.tables.len(),
            columns = catalog.column_count(),
            "fetched completion catalog"
        );
        Ok(catalog)
    }

    #[tracing::instrument(skip(self))]
    async fn list_databases(&self, connection_id: &str) -> Result<Vec<String>> {
        let mut conn = self.get_conn(connection_id).await?;
        let databases: Vec<String> = conn
            .query("SHOW DATABASES")
            .await
            .map_err(|e| QueryBenchError::Query(e.to_string()))?;

        Ok(databases
            .into_iter()
            .filter(|database| !is_system_database(database))
            .collect())
    }
}
