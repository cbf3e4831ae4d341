//! REST backend for a Firebase-style realtime database.
//!
//! Nodes are addressed as `{base_url}/{path}.json`, optionally carrying an
//! `auth` token. `GET` of a missing node yields JSON `null`, which maps to
//! an absent value. The wire protocol beyond these three verbs is the
//! store's own business.

use crate::error::{Error, Result};
use crate::store::backend::StoreBackend;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub struct FirebaseStore {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    /// Builds a handle for the database at `base_url`. Constructed once at
    /// process start; requests carry a bounded transport timeout so a
    /// wedged store cannot hold a request open forever.
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Store(format!("failed to build store client: {}", e)))?;
        Ok(FirebaseStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn node_url(&self, path: &str) -> String {
        match &self.auth_token {
            Some(token) => format!("{}/{}.json?auth={}", self.base_url, path, token),
            None => format!("{}/{}.json", self.base_url, path),
        }
    }
}

#[async_trait]
impl StoreBackend for FirebaseStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let response = self
            .client
            .get(self.node_url(path))
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Store(e.to_string()))?;
        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(value))
    }

    async fn put(&self, path: &str, value: Value) -> Result<()> {
        self.client
            .put(self.node_url(path))
            .json(&value)
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Store(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.client
            .delete(self.node_url(path))
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Store(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FirebaseStore;

    #[test]
    fn node_urls_are_slash_json_addressed() {
        let store = FirebaseStore::new("https://db.example.com/", None).unwrap();
        assert_eq!(
            store.node_url("records/k1/0"),
            "https://db.example.com/records/k1/0.json"
        );
    }

    #[test]
    fn auth_token_is_appended_when_configured() {
        let store = FirebaseStore::new("https://db.example.com", Some("secret".into())).unwrap();
        assert_eq!(
            store.node_url("records/k1"),
            "https://db.example.com/records/k1.json?auth=secret"
        );
    }
}
