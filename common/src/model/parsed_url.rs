use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured form of a URL recovered from a scanned symbol.
///
/// Produced only by the decode path and returned to the caller; never
/// persisted. Query values are kept exactly as they appear in the raw
/// string; no percent-decoding is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedUrl {
    pub full_url: String,
    pub protocol: String,
    pub host: String,
    pub path: String,
    pub query_params: HashMap<String, String>,
}
