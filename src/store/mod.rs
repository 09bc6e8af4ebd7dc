//! Transactional record store.
//!
//! Records live in memory in a [`Tables`] value guarded by a
//! [`tokio::sync::RwLock`]. Writes go through [`Store::transaction`]:
//!
//! 1. take the write lock
//! 2. run the closure against a working copy of the tables
//! 3. on `Err`, drop the copy (rollback)
//! 4. on `Ok`, write the copy to the snapshot file (if any) and swap it in
//!
//! Because every write holds the lock for its whole closure, sequence
//! allocation and read-modify-write balance updates are atomic.
//!
//! Each transaction clones every table and rewrites the whole snapshot,
//! so a write costs O(total records). The credit ledger only grows. This
//! suits a single-node deployment with tens of thousands of records; a
//! larger data set needs an incremental backend behind the same
//! `read`/`transaction` interface.

mod scopes;
mod tables;

use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{PlatformError, PlatformResult};

pub use scopes::RecordScopes;
pub use tables::{Tables, find_owned, find_owned_mut};

/// The record store shared by all request handlers.
#[derive(Debug)]
pub struct Store {
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl Store {
    /// Creates an empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            snapshot_path: None,
        }
    }

    /// Opens a store backed by a JSON snapshot file.
    ///
    /// Loads the snapshot if the file exists, otherwise starts empty. The
    /// file is created on the first committed transaction.
    pub fn open<P: AsRef<Path>>(path: P) -> PlatformResult<Self> {
        let path = path.as_ref().to_path_buf();

        let tables = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| persistence(&path, e))?;
            let tables: Tables = serde_json::from_str(&content).map_err(|e| persistence(&path, e))?;
            debug!(
                path = %path.display(),
                patients = tables.patients.len(),
                orders = tables.orders.len(),
                "Loaded store snapshot"
            );
            tables
        } else {
            debug!(path = %path.display(), "No store snapshot, starting empty");
            Tables::default()
        };

        Ok(Self {
            tables: RwLock::new(tables),
            snapshot_path: Some(path),
        })
    }

    /// Runs a read-only query against the tables.
    pub async fn read<R>(&self, query: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.tables.read().await;
        query(&tables)
    }

    /// Runs `work` as one atomic unit.
    ///
    /// Either every change the closure made is committed (and persisted),
    /// or none is.
    ///
    /// # Example
    ///
    /// ```
    /// use bizhub::error::PlatformError;
    /// use bizhub::rules::CodeKind;
    /// use bizhub::store::Store;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let store = Store::in_memory();
    ///
    /// let failed: Result<u64, PlatformError> = store
    ///     .transaction(|tables| {
    ///         tables.next_sequence("acme", CodeKind::Order, "20261015");
    ///         Err(PlatformError::business_rule("abort"))
    ///     })
    ///     .await;
    /// assert!(failed.is_err());
    ///
    /// let seq = store
    ///     .transaction(|tables| Ok(tables.next_sequence("acme", CodeKind::Order, "20261015")))
    ///     .await
    ///     .unwrap();
    /// assert_eq!(seq, 1);
    /// # });
    /// ```
    pub async fn transaction<R>(
        &self,
        work: impl FnOnce(&mut Tables) -> PlatformResult<R>,
    ) -> PlatformResult<R> {
        let mut tables = self.tables.write().await;
        let mut working = tables.clone();

        let result = match work(&mut working) {
            Ok(result) => result,
            Err(e) => {
                debug!(error = %e, "Transaction rolled back");
                return Err(e);
            }
        };

        if let Some(path) = &self.snapshot_path {
            if let Err(e) = write_snapshot(path, &working).await {
                warn!(error = %e, path = %path.display(), "Snapshot write failed, rolling back");
                return Err(e);
            }
        }

        *tables = working;
        Ok(result)
    }

    /// The snapshot file, if the store is persistent.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }
}

async fn write_snapshot(path: &Path, tables: &Tables) -> PlatformResult<()> {
    let body = serde_json::to_vec_pretty(tables).map_err(|e| persistence(path, e))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, body)
        .await
        .map_err(|e| persistence(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| persistence(path, e))?;
    Ok(())
}

fn persistence(path: &Path, error: impl std::fmt::Display) -> PlatformError {
    PlatformError::Persistence {
        message: format!("{}: {}", path.display(), error),
    }
}
