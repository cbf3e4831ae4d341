//! Shared issuance stages: payload building and the render/verify gate.
//!
//! Both the create and the update paths run the same pipeline; they differ
//! only in where the sequential id comes from and which store operation
//! persists the result.

use crate::error::{Error, Result};
use crate::symbol::{codec, logo};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::model::code_record::CodeRecord;
use common::model::variant::Variant;
use image::{DynamicImage, RgbaImage};
use serde::Deserialize;

/// Query surface shared by the generate and update endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueParams {
    /// Base URL (self-managed variants) or the full payload text
    /// (externally-managed variants).
    pub url: String,
    /// Issuance mode, the integer 1-4.
    pub variant: u8,
    /// Side length in pixels; defaults to 300.
    pub size: Option<u32>,
    /// Error-correction level `L`/`M`/`Q`/`H`, case-insensitive;
    /// defaults to `M`.
    pub error_correction: Option<String>,
    /// Scanned/valid flag; defaults to false.
    pub is_scanned: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Composite the configured logo over the symbol.
    pub logo: Option<bool>,
}

impl IssueParams {
    pub fn variant(&self) -> Result<Variant> {
        Variant::try_from(self.variant).map_err(Error::InvalidArgument)
    }

    pub fn effective_size(&self) -> u32 {
        self.size.unwrap_or(codec::DEFAULT_SIZE)
    }

    pub fn effective_level(&self) -> qrcode::EcLevel {
        codec::level_from_param(self.error_correction.as_deref())
    }

    pub fn wants_logo(&self) -> bool {
        self.logo.unwrap_or(false)
    }
}

/// The branding overlay, loaded once at startup and shared across
/// requests. `None` when no logo asset is configured.
pub struct LogoOverlay {
    pub image: Option<DynamicImage>,
}

/// Builds the payload text for a request. Self-managed variants append
/// the client key, the sequential id and the validity window; externally-
/// managed variants pass the caller's text through verbatim.
pub fn build_payload(params: &IssueParams, client_key: &str, id: Option<u32>) -> Result<String> {
    let variant = params.variant()?;
    if !variant.embeds_identity() {
        return Ok(params.url.clone());
    }
    let id = id.ok_or_else(|| {
        Error::InvalidArgument("self-managed variants require a sequential id".into())
    })?;
    Ok(format!(
        "{}?apiKey={}&id={}&isScanned={}&startDate={}&endDate={}",
        params.url,
        client_key,
        id,
        params.is_scanned.unwrap_or(false),
        params.start_date.as_deref().unwrap_or_default(),
        params.end_date.as_deref().unwrap_or_default(),
    ))
}

/// Renders `payload`, composites the logo when requested, and runs the
/// readability gate on the final artifact. Returns the verified raster.
///
/// The gate is strict: one decode attempt, no re-render at a larger size
/// or higher correction level. An unreadable result aborts the whole
/// issuance with `NotReadable` before anything is persisted.
pub fn render_verified(
    payload: &str,
    params: &IssueParams,
    overlay: &LogoOverlay,
) -> Result<RgbaImage> {
    let mut symbol = codec::encode(payload, params.effective_size(), params.effective_level())?;

    if params.wants_logo() {
        let logo = overlay
            .image
            .as_ref()
            .ok_or_else(|| Error::InvalidArgument("no logo asset configured".into()))?;
        symbol = logo::embed(&symbol, logo);
    }

    if !codec::verify(&symbol) {
        log::warn!(
            "rendered symbol failed readability (size {}, level {}, logo {})",
            params.effective_size(),
            codec::level_name(params.effective_level()),
            params.wants_logo(),
        );
        return Err(Error::NotReadable);
    }

    Ok(symbol)
}

/// Assembles the record persisted for a verified render.
pub fn build_record(params: &IssueParams, payload: String, png: &[u8]) -> Result<CodeRecord> {
    Ok(CodeRecord {
        payload,
        size: params.effective_size(),
        error_correction: codec::level_name(params.effective_level()).to_string(),
        base64_image: BASE64.encode(png),
        is_scanned: params.is_scanned.unwrap_or(false),
        start_date: params.start_date.clone().unwrap_or_default(),
        end_date: params.end_date.clone().unwrap_or_default(),
        variant: params.variant()?,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{no_overlay, params};
    use super::{build_payload, render_verified};
    use crate::error::Error;
    use crate::symbol::codec;
    use image::DynamicImage;

    #[test]
    fn external_variants_pass_the_url_through() {
        let params = params("https://ex.com/fixed", 1);
        let payload = build_payload(&params, "k1", None).unwrap();
        assert_eq!(payload, "https://ex.com/fixed");
    }

    #[test]
    fn self_managed_variants_append_identity_and_window() {
        let mut p = params("https://ex.com", 4);
        p.start_date = Some("20250101".into());
        p.end_date = Some("20260101".into());
        let payload = build_payload(&p, "k1", Some(0)).unwrap();
        assert_eq!(
            payload,
            "https://ex.com?apiKey=k1&id=0&isScanned=false&startDate=20250101&endDate=20260101"
        );
    }

    #[test]
    fn unknown_variant_is_invalid() {
        let p = params("https://ex.com", 9);
        assert!(matches!(
            build_payload(&p, "k1", None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn verified_render_decodes_to_the_payload() {
        let p = params("https://ex.com", 1);
        let symbol = render_verified("https://ex.com", &p, &no_overlay()).unwrap();
        let decoded = codec::decode(&DynamicImage::ImageRgba8(symbol)).unwrap();
        assert_eq!(decoded, "https://ex.com");
    }

    #[test]
    fn logo_request_without_asset_is_invalid() {
        let mut p = params("https://ex.com", 1);
        p.logo = Some(true);
        assert!(matches!(
            render_verified("https://ex.com", &p, &no_overlay()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
