//! Console maintenance tasks: cache directory setup and past-date cleanup.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::store::Store;

/// A cache directory and whether this run created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDirectory {
    /// Full path of the directory.
    pub path: PathBuf,
    /// True if the directory did not exist before.
    pub created: bool,
}

/// Creates every configured cache directory under `root`.
///
/// Existing directories are left alone. Entries must be relative paths
/// that stay inside `root`.
pub fn ensure_cache_directories(root: &Path, dirs: &[String]) -> PlatformResult<Vec<CacheDirectory>> {
    let mut ensured = Vec::with_capacity(dirs.len());

    for dir in dirs {
        let relative = Path::new(dir);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if dir.trim().is_empty() || escapes {
            return Err(PlatformError::ConfigParseError {
                path: "maintenance.cache_directories".to_string(),
                message: format!("'{}' must be a relative path inside the cache root", dir),
            });
        }

        let path = root.join(relative);
        let created = !path.is_dir();
        std::fs::create_dir_all(&path).map_err(|e| PlatformError::Persistence {
            message: format!("{}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), created, "Cache directory ready");
        ensured.push(CacheDirectory { path, created });
    }

    info!(
        root = %root.display(),
        created = ensured.iter().filter(|d| d.created).count(),
        total = ensured.len(),
        "Cache directories ensured"
    );
    Ok(ensured)
}

/// Deletes reservations dated before `today`.
///
/// Runs as one transaction and returns the number removed per tenant.
pub async fn cleanup_past_reservations(
    store: &Store,
    today: NaiveDate,
) -> PlatformResult<BTreeMap<String, usize>> {
    let removed = store
        .transaction(|tables| {
            let past: Vec<(Uuid, String)> = tables
                .reservations
                .values()
                .filter(|r| r.reserved_for < today)
                .map(|r| (r.id, r.client_identifier.clone()))
                .collect();

            let mut removed: BTreeMap<String, usize> = BTreeMap::new();
            for (id, client) in past {
                tables.reservations.remove(&id);
                *removed.entry(client).or_default() += 1;
            }
            Ok(removed)
        })
        .await?;

    info!(
        today = %today,
        removed = removed.values().sum::<usize>(),
        tenants = removed.len(),
        "Past reservations cleaned up"
    );
    Ok(removed)
}
