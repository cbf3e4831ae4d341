use crate::model::variant::Variant;
use serde::{Deserialize, Serialize};

/// The persisted unit for one issued code, stored in the remote tree at
/// `records/{client_key}/{sequential_id}`.
///
/// A record is written only after the rendered symbol passed the
/// readability check, so `base64_image` always holds a decodable PNG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRecord {
    /// The exact text encoded into the symbol. For self-managed variants
    /// this includes the appended identity/validity query parameters.
    pub payload: String,
    /// Rendered side length in pixels.
    pub size: u32,
    /// Error-correction level the symbol was rendered at (`L`/`M`/`Q`/`H`).
    pub error_correction: String,
    /// The rendered PNG, base64-encoded for storage.
    pub base64_image: String,
    /// Scanned/valid flag as supplied by the caller.
    pub is_scanned: bool,
    /// Validity window start, an opaque caller-supplied string.
    pub start_date: String,
    /// Validity window end, an opaque caller-supplied string.
    pub end_date: String,
    /// Issuance mode this record was created under.
    pub variant: Variant,
}
