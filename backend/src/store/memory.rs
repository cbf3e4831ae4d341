//! In-process store backend: a JSON tree behind an async lock.
//!
//! Used when no remote store is configured, and by the test suite. Nodes
//! are plain JSON objects keyed by path segment, which matches the
//! object-shaped collections the gateway already understands.

use crate::error::{Error, Result};
use crate::store::backend::StoreBackend;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

pub struct MemoryStore {
    root: RwLock<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            root: RwLock::new(Value::Object(Map::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Coerces a node to an object, replacing any leaf that is in the way.
fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let root = self.root.read().await;
        let mut node = &*root;
        for segment in segments(path) {
            match node.get(segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        if node.is_null() {
            return Ok(None);
        }
        Ok(Some(node.clone()))
    }

    async fn put(&self, path: &str, value: Value) -> Result<()> {
        let segments = segments(path);
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| Error::Store("empty store path".into()))?;

        let mut root = self.root.write().await;
        let mut node = &mut *root;
        for segment in parents {
            node = ensure_object(node)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        ensure_object(node).insert(last.to_string(), value);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let segments = segments(path);
        let Some((last, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut root = self.root.write().await;
        let mut node = &mut *root;
        for segment in parents {
            match node.get_mut(segment) {
                Some(child) => node = child,
                None => return Ok(()),
            }
        }
        if let Some(map) = node.as_object_mut() {
            map.remove(*last);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::backend::StoreBackend;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_round_trip() {
        let store = MemoryStore::new();
        store
            .put("records/k1/0", json!({"payload": "p"}))
            .await
            .unwrap();
        let node = store.get("records/k1/0").await.unwrap().unwrap();
        assert_eq!(node["payload"], "p");
    }

    #[tokio::test]
    async fn intermediate_nodes_are_created() {
        let store = MemoryStore::new();
        store.put("a/b/c/d", json!(1)).await.unwrap();
        let subtree = store.get("a/b").await.unwrap().unwrap();
        assert_eq!(subtree["c"]["d"], 1);
    }

    #[tokio::test]
    async fn missing_paths_read_as_none() {
        let store = MemoryStore::new();
        assert!(store.get("records/nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_deletes_the_subtree() {
        let store = MemoryStore::new();
        store.put("records/k1/0", json!("a")).await.unwrap();
        store.put("records/k1/1", json!("b")).await.unwrap();
        store.remove("records/k1").await.unwrap();
        assert!(store.get("records/k1").await.unwrap().is_none());
        // Removing again is still fine.
        store.remove("records/k1").await.unwrap();
    }
}
