//! Tag-scoped read cache in front of the sheet store.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;

use crate::sheet::Rows;

/// Cached row sets keyed by `(tag, key)`.
///
/// Invalidating a tag drops every entry stored under it. Failed fetches are
/// not cached.
#[derive(Debug, Default)]
pub struct TagCache {
    entries: RwLock<HashMap<(String, String), Rows>>,
}

impl TagCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rows for `(tag, key)`, or runs `fetch` and stores
    /// its result.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `fetch`.
    pub async fn get_or_fetch<F, Fut, E>(&self, tag: &str, key: &str, fetch: F) -> Result<Rows, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Rows, E>>,
    {
        let cache_key = (tag.to_string(), key.to_string());
        if let Some(rows) = self.entries.read().await.get(&cache_key) {
            tracing::debug!(tag, key, "cache hit");
            return Ok(rows.clone());
        }

        let rows = fetch().await?;
        self.entries.write().await.insert(cache_key, rows.clone());
        Ok(rows)
    }

    pub async fn invalidate(&self, tag: &str) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(entry_tag, _), _| entry_tag != tag);
        tracing::debug!(tag, dropped = before - entries.len(), "cache tag invalidated");
    }
}
