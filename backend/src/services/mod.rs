//! HTTP service modules, one scope per feature area.
//!
//! - `codes`: issuance, preview, decode and readability checking.
//! - `records`: reads and deletions against the persisted record tree.

pub mod codes;
pub mod records;

use crate::error::Error;
use actix_web::HttpRequest;

/// Header carrying the caller's client key, which doubles as the store
/// partition key. Authentication of the key is handled upstream; here it
/// is only a required request parameter.
const CLIENT_KEY_HEADER: &str = "x-api-key";

pub(crate) fn client_key(req: &HttpRequest) -> Result<String, Error> {
    req.headers()
        .get(CLIENT_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidArgument(format!("missing {} header", CLIENT_KEY_HEADER)))
}
