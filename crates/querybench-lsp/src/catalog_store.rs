//! Active completion catalog
//!
//! Holds the catalog of the currently selected (connection, database) pair.
//! A catalog is swapped in whole, never merged, so readers see either the
//! previous snapshot or the next one.
//!
//! Every load bumps a fetch epoch. The fetch captures its epoch and the result
//! is applied only if no newer load started in the meantime; a slow fetch for a
//! database the user already left is dropped.

use parking_lot::RwLock;
use querybench_core::{BackendGateway, CompletionCatalog};
use std::sync::Arc;

/// The (connection, database) pair a catalog belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogKey {
    pub connection_id: String,
    pub database: String,
}

impl CatalogKey {
    pub fn new(connection_id: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            database: database.into(),
        }
    }
}

/// Result of [`CatalogStore::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLoad {
    /// The fetched catalog is now the active one
    Applied,
    /// A newer load started before this fetch finished; its result was dropped
    Stale,
    /// The fetch failed; the catalog stays absent
    Failed,
}

#[derive(Default)]
struct StoreState {
    catalog: Option<Arc<CompletionCatalog>>,
    key: Option<CatalogKey>,
    epoch: u64,
    loading: bool,
}

#[derive(Default)]
pub struct CatalogStore {
    state: RwLock<StoreState>,
    /// Merged into every applied catalog
    extra_keywords: Vec<String>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_keywords(extra_keywords: Vec<String>) -> Self {
        Self {
            state: RwLock::default(),
            extra_keywords,
        }
    }

    /// The active catalog, absent until the first load completes
    pub fn current(&self) -> Option<Arc<CompletionCatalog>> {
        self.state.read().catalog.clone()
    }

    pub fn key(&self) -> Option<CatalogKey> {
        self.state.read().key.clone()
    }

    /// True while a fetch for the current key is in flight
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Whether selecting `(connection_id, database)` requires a fetch
    pub fn needs_reload(&self, connection_id: &str, database: &str) -> bool {
        let state = self.state.read();
        let same_key = state
            .key
            .as_ref()
            .is_some_and(|key| key.connection_id == connection_id && key.database == database);
        !(same_key && (state.catalog.is_some() || state.loading))
    }

    /// Start a load for `key`: drop the current catalog and bump the epoch.
    ///
    /// Returns the epoch to pass to [`Self::apply_if_current`].
    pub fn begin_load(&self, key: CatalogKey) -> u64 {
        let mut state = self.state.write();
        state.epoch += 1;
        state.catalog = None;
        state.key = Some(key);
        state.loading = true;
        state.epoch
    }

    /// Install `catalog` if `epoch` is still the latest load
    pub fn apply_if_current(&self, epoch: u64, catalog: CompletionCatalog) -> bool {
        let catalog = if self.extra_keywords.is_empty() {
            catalog
        } else {
            catalog.with_extra_keywords(self.extra_keywords.iter().cloned())
        };

        let mut state = self.state.write();
        if state.epoch != epoch {
            return false;
        }
        state.catalog = Some(Arc::new(catalog));
        state.loading = false;
        true
    }

    /// Mark the load with `epoch` as finished without a catalog
    pub fn fail_if_current(&self, epoch: u64) -> bool {
        let mut state = self.state.write();
        if state.epoch != epoch {
            return false;
        }
        state.loading = false;
        true
    }

    /// Forget the catalog, e.g. when no database is selected
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.epoch += 1;
        state.catalog = None;
        state.key = None;
        state.loading = false;
    }

    /// Fetch and install the catalog of `database` on `connection_id`.
    ///
    /// Failures are logged and leave the catalog absent, which degrades
    /// completion to no suggestions instead of blocking the editor.
    pub async fn load(
        &self,
        gateway: &dyn BackendGateway,
        connection_id: &str,
        database: &str,
    ) -> CatalogLoad {
        let key = CatalogKey::new(connection_id, database);
        let epoch = self.begin_load(key.clone());
        self.finish_load(gateway, &key, epoch).await
    }

    /// Fetch the catalog for a load already started with [`Self::begin_load`].
    ///
    /// Lets the caller claim the epoch synchronously, so loads are ordered by
    /// selection even when the fetches run on spawned tasks.
    pub async fn finish_load(
        &self,
        gateway: &dyn BackendGateway,
        key: &CatalogKey,
        epoch: u64,
    ) -> CatalogLoad {
        let CatalogKey {
            connection_id,
            database,
        } = key;
        tracing::debug!(%connection_id, %database, epoch, "loading completion catalog");

        match gateway.fetch_completion_catalog(connection_id, database).await {
            Ok(catalog) => {
                let tables = catalog.tables.len();
                let columns = catalog.column_count();
                if self.apply_if_current(epoch, catalog) {
                    tracing::info!(%connection_id, %database, tables, columns, "completion catalog loaded");
                    CatalogLoad::Applied
                } else {
                    tracing::debug!(%connection_id, %database, epoch, "dropping stale completion catalog");
                    CatalogLoad::Stale
                }
            }
            Err(e) => {
                tracing::warn!(%connection_id, %database, error = %e, "failed to load completion catalog");
                if self.fail_if_current(epoch) {
                    CatalogLoad::Failed
                } else {
                    CatalogLoad::Stale
                }
            }
        }
    }
}
