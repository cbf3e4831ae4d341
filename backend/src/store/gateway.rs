//! Typed record operations over the raw store seam.
//!
//! Every method completes exactly once with either a value or a typed
//! error, and nothing is retried. Mutations for one client key are
//! serialized through a per-client async mutex, so the count-then-write
//! pair behind [`StoreGateway::insert_next`] and the check-then-mutate
//! pair behind update/delete cannot interleave with a competing mutation
//! in this process. Serialization across processes is the backing store's
//! concern.

use crate::error::{Error, Result};
use crate::store::backend::StoreBackend;
use crate::store::{client_path, record_path, RECORDS_ROOT};
use common::model::code_record::CodeRecord;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct StoreGateway {
    backend: Arc<dyn StoreBackend>,
    client_locks: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl StoreGateway {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        StoreGateway {
            backend,
            client_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    fn lock_for(&self, client_key: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .client_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(client_key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Next free sequential id for a client: the current child count of
    /// its collection, 0 when it has none. Read-only: no reservation is
    /// made, so the id is only authoritative once `insert_next` assigns
    /// one.
    pub async fn next_id(&self, client_key: &str) -> Result<u32> {
        let collection = self.backend.get(&client_path(client_key)).await?;
        Ok(child_count(collection.as_ref()) as u32)
    }

    /// All records for all clients, grouped by client key.
    pub async fn fetch_all(&self) -> Result<HashMap<String, Vec<CodeRecord>>> {
        debug!("fetching full record tree");
        let root = self.backend.get(RECORDS_ROOT).await?;
        let mut all = HashMap::new();
        let Some(Value::Object(clients)) = root else {
            return Ok(all);
        };
        for (client_key, collection) in clients {
            let records = collection_records(&collection)?
                .into_iter()
                .map(|(_, record)| record)
                .collect();
            all.insert(client_key, records);
        }
        Ok(all)
    }

    /// Records for one client in id order. Fails with `NotFound` when the
    /// client has no collection.
    pub async fn fetch_by_client(&self, client_key: &str) -> Result<Vec<CodeRecord>> {
        debug!("fetching records for client {}", client_key);
        let collection = self
            .backend
            .get(&client_path(client_key))
            .await?
            .ok_or_else(|| Error::NotFound(format!("no records for client: {}", client_key)))?;
        let records: Vec<CodeRecord> = collection_records(&collection)?
            .into_iter()
            .map(|(_, record)| record)
            .collect();
        if records.is_empty() {
            return Err(Error::NotFound(format!(
                "no records for client: {}",
                client_key
            )));
        }
        Ok(records)
    }

    /// Appends `record` at the client's next free index and returns the
    /// assigned id. The count-then-write pair holds the client lock, so
    /// concurrent inserts for one client always get distinct ids.
    pub async fn insert_next(&self, client_key: &str, record: &CodeRecord) -> Result<u32> {
        let lock = self.lock_for(client_key);
        let _guard = lock.lock().await;

        let collection = self.backend.get(&client_path(client_key)).await?;
        let id = child_count(collection.as_ref()) as u32;
        let value = serde_json::to_value(record)
            .map_err(|e| Error::Store(format!("record not serializable: {}", e)))?;
        self.backend.put(&record_path(client_key, id), value).await?;
        debug!("inserted record {}/{}", client_key, id);
        Ok(id)
    }

    /// Overwrites the record at `(client_key, id)`. The existence check
    /// and the write are distinct store operations held under the client
    /// lock; a missing record fails with `NotFound` and writes nothing.
    pub async fn update_by_id(&self, client_key: &str, id: u32, record: &CodeRecord) -> Result<()> {
        let lock = self.lock_for(client_key);
        let _guard = lock.lock().await;

        let path = record_path(client_key, id);
        if self.backend.get(&path).await?.is_none() {
            return Err(Error::NotFound(format!("no record for id: {}", id)));
        }
        let value = serde_json::to_value(record)
            .map_err(|e| Error::Store(format!("record not serializable: {}", e)))?;
        self.backend.put(&path, value).await?;
        debug!("updated record {}/{}", client_key, id);
        Ok(())
    }

    /// Removes the record at `(client_key, id)`; `NotFound` when absent.
    pub async fn delete_by_id(&self, client_key: &str, id: u32) -> Result<()> {
        let lock = self.lock_for(client_key);
        let _guard = lock.lock().await;

        let path = record_path(client_key, id);
        if self.backend.get(&path).await?.is_none() {
            return Err(Error::NotFound(format!("no record for id: {}", id)));
        }
        self.backend.remove(&path).await?;
        debug!("deleted record {}/{}", client_key, id);
        Ok(())
    }

    /// Unconditionally removes a client's whole collection. Succeeds even
    /// when the client never had one.
    pub async fn delete_all_for_client(&self, client_key: &str) -> Result<()> {
        let lock = self.lock_for(client_key);
        let _guard = lock.lock().await;

        self.backend.remove(&client_path(client_key)).await?;
        debug!("deleted all records for client {}", client_key);
        Ok(())
    }
}

/// Number of children in a collection node. Collections arrive either as
/// dense arrays (Firebase coalesces integer keys) or as objects keyed by
/// index; both count the same way, and the count doubles as the next free
/// slot index.
fn child_count(node: Option<&Value>) -> usize {
    match node {
        Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).count(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}

/// Decodes a collection node into `(id, record)` pairs in id order.
fn collection_records(node: &Value) -> Result<Vec<(u32, CodeRecord)>> {
    let mut records = Vec::new();
    match node {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if item.is_null() {
                    continue;
                }
                records.push((index as u32, decode_record(item)?));
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                let id = key
                    .parse::<u32>()
                    .map_err(|_| Error::Store(format!("non-numeric record key: {}", key)))?;
                records.push((id, decode_record(item)?));
            }
            records.sort_by_key(|(id, _)| *id);
        }
        other => {
            return Err(Error::Store(format!(
                "unexpected collection shape: {}",
                other
            )))
        }
    }
    Ok(records)
}

fn decode_record(value: &Value) -> Result<CodeRecord> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::Store(format!("malformed stored record: {}", e)))
}
