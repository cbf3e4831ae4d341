//! The raw store seam: three asynchronous operations on JSON nodes.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// An opaque asynchronous hierarchical key-value store.
///
/// Paths are slash-delimited, rooted at the store's top node. Values are
/// JSON trees; writing a value at a path replaces the whole subtree there,
/// and removing a path removes its subtree. Implementations must complete
/// every call exactly once: either a value or a `Store` error, never
/// both, and perform no internal retries.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Reads the subtree at `path`. `None` when the node does not exist.
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Replaces the subtree at `path` with `value`, creating intermediate
    /// nodes as needed.
    async fn put(&self, path: &str, value: Value) -> Result<()>;

    /// Removes the subtree at `path`. Removing a missing node is not an
    /// error.
    async fn remove(&self, path: &str) -> Result<()>;
}
