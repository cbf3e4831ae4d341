//! # Record Store Service Module
//!
//! Read and delete operations against the persisted record tree, under
//! `/api/records`. The client key is bound from the `x-api-key` header,
//! matching the partition key the issuance paths write under.
//!
//! ## Registered Routes:
//!
//! *   **`GET /`** -> `get_all::process`: every client's records, grouped
//!     by client key.
//! *   **`GET /client`** -> `get_by_client::process`: the calling client's
//!     records in id order; 404 when the client has none.
//! *   **`DELETE /client/{id}`** -> `delete::process`: existence-checked
//!     removal of one record; 404 when the id was never issued.
//! *   **`DELETE /client`** -> `delete_all::process`: unconditional removal
//!     of the calling client's whole collection.

mod delete;
mod delete_all;
mod get_all;
mod get_by_client;

use actix_web::web::{self, get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/records";

/// Configures and returns the Actix `Scope` for the record endpoints.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get_all::process))
        .route("/client", get().to(get_by_client::process))
        .route("/client/{id}", web::delete().to(delete::process))
        .route("/client", web::delete().to(delete_all::process))
}
