//! Persistence against the remote record store.
//!
//! The store is an asynchronous hierarchical key-value tree addressed by
//! slash-delimited paths (`records/{client_key}/{sequential_id}`). The
//! [`backend::StoreBackend`] trait is the only seam the rest of the
//! service sees; [`gateway::StoreGateway`] layers the typed record
//! operations, id allocation and per-client serialization on top of it.
//!
//! A backend handle is constructed once at process start and injected;
//! there is no global store state.

pub mod backend;
pub mod firebase;
pub mod gateway;
pub mod memory;

/// Root node under which all client collections live.
pub const RECORDS_ROOT: &str = "records";

pub(crate) fn client_path(client_key: &str) -> String {
    format!("{}/{}", RECORDS_ROOT, client_key)
}

pub(crate) fn record_path(client_key: &str, id: u32) -> String {
    format!("{}/{}/{}", RECORDS_ROOT, client_key, id)
}
