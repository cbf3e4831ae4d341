//! # Code Issuance Service Module
//!
//! Aggregates the endpoints that render, verify, persist and read back
//! scannable codes under `/api/codes`.
//!
//! ## Registered Routes:
//!
//! *   **`POST /generate`**:
//!     - **Handler**: `issue::process`
//!     - **Description**: Issues a new code for the `x-api-key` client.
//!       Self-managed variants allocate the next sequential id and embed
//!       it, together with the validity window, into the payload. The
//!       rendered symbol must pass the readability gate (after logo
//!       compositing when requested) before the record is persisted; the
//!       PNG bytes are returned.
//!
//! *   **`PUT /update/{id}`**:
//!     - **Handler**: `update::process`
//!     - **Description**: Re-renders a code and overwrites the existing
//!       record at the caller-supplied id. No id is allocated on this
//!       path, even for self-managed variants.
//!
//! *   **`GET /preview`**:
//!     - **Handler**: `preview::process`
//!     - **Description**: Renders and verifies a symbol (optionally with
//!       the logo overlay) without touching the store.
//!
//! *   **`POST /read`**:
//!     - **Handler**: `decode::process`
//!     - **Description**: Decodes an uploaded symbol image and returns the
//!       payload split into protocol, host, path and query parameters.
//!
//! *   **`POST /check`**:
//!     - **Handler**: `decode::check`
//!     - **Description**: Readability check of an uploaded symbol image.

mod decode;
mod issue;
pub mod pipeline;
mod preview;
mod update;

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/codes";

/// Configures and returns the Actix `Scope` for the code endpoints.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/generate", post().to(issue::process))
        .route("/update/{id}", put().to(update::process))
        .route("/preview", get().to(preview::process))
        .route("/read", post().to(decode::process))
        .route("/check", post().to(decode::check))
}
