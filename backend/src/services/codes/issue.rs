//! Issues a new code: allocate identity, render, verify, persist.

use crate::error::Result;
use crate::services::client_key;
use crate::services::codes::pipeline::{
    build_payload, build_record, render_verified, IssueParams, LogoOverlay,
};
use crate::store::gateway::StoreGateway;
use crate::symbol::codec;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use log::info;

pub async fn process(
    req: HttpRequest,
    params: web::Query<IssueParams>,
    gateway: web::Data<StoreGateway>,
    overlay: web::Data<LogoOverlay>,
) -> impl Responder {
    let client_key = match client_key(&req) {
        Ok(key) => key,
        Err(e) => return e.error_response(),
    };
    match issue_and_store(&gateway, &overlay, &params, &client_key).await {
        Ok(png) => HttpResponse::Ok().content_type("image/png").body(png),
        Err(e) => e.error_response(),
    }
}

/// The create path of the issuance pipeline.
///
/// Self-managed variants read the client's next sequential id and embed it
/// in the payload before rendering; externally-managed variants render the
/// caller's text unchanged. Persistence happens only after the readability
/// gate passes, so an unreadable render leaves the store untouched.
pub async fn issue_and_store(
    gateway: &StoreGateway,
    overlay: &LogoOverlay,
    params: &IssueParams,
    client_key: &str,
) -> Result<Vec<u8>> {
    let payload = if params.variant()?.embeds_identity() {
        let id = gateway.next_id(client_key).await?;
        build_payload(params, client_key, Some(id))?
    } else {
        build_payload(params, client_key, None)?
    };

    let symbol = render_verified(&payload, params, overlay)?;
    let png = codec::to_png_bytes(&symbol)?;

    let record = build_record(params, payload, &png)?;
    let id = gateway.insert_next(client_key, &record).await?;
    info!("issued code {} for client {}", id, client_key);

    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::issue_and_store;
    use crate::error::Error;
    use crate::services::codes::pipeline::test_support::{no_overlay, params};
    use crate::services::codes::pipeline::LogoOverlay;
    use crate::store::backend::StoreBackend;
    use crate::store::gateway::StoreGateway;
    use crate::store::memory::MemoryStore;
    use crate::symbol::codec;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use common::model::variant::Variant;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::sync::Arc;

    fn gateway_over(backend: Arc<MemoryStore>) -> StoreGateway {
        StoreGateway::new(backend)
    }

    #[tokio::test]
    async fn self_managed_issuance_embeds_id_and_persists_at_slot_zero() {
        let backend = Arc::new(MemoryStore::new());
        let gateway = gateway_over(backend.clone());

        let mut p = params("https://ex.com", 4);
        p.size = Some(300);
        p.error_correction = Some("H".into());
        p.start_date = Some("20250101".into());
        p.end_date = Some("20260101".into());

        let png = issue_and_store(&gateway, &no_overlay(), &p, "k1")
            .await
            .unwrap();

        // The returned PNG decodes back to the full self-managed payload.
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!(
            codec::decode(&image).unwrap(),
            "https://ex.com?apiKey=k1&id=0&isScanned=false&startDate=20250101&endDate=20260101"
        );

        // The record landed at records/k1/0 with the same payload.
        let stored = backend.get("records/k1/0").await.unwrap().unwrap();
        assert_eq!(
            stored["payload"],
            "https://ex.com?apiKey=k1&id=0&isScanned=false&startDate=20250101&endDate=20260101"
        );
        assert_eq!(stored["error_correction"], "H");

        let records = gateway.fetch_by_client("k1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variant, Variant::SelfManagedMultiUse);
        assert_eq!(BASE64.decode(&records[0].base64_image).unwrap(), png);
    }

    #[tokio::test]
    async fn sequential_issuances_advance_the_id() {
        let gateway = gateway_over(Arc::new(MemoryStore::new()));
        let p = params("https://ex.com", 2);
        issue_and_store(&gateway, &no_overlay(), &p, "k1")
            .await
            .unwrap();
        issue_and_store(&gateway, &no_overlay(), &p, "k1")
            .await
            .unwrap();
        let records = gateway.fetch_by_client("k1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].payload.contains("&id=1&"));
    }

    #[tokio::test]
    async fn external_variant_stores_the_caller_text_verbatim() {
        let gateway = gateway_over(Arc::new(MemoryStore::new()));
        let p = params("https://ex.com/static-code", 3);
        issue_and_store(&gateway, &no_overlay(), &p, "k1")
            .await
            .unwrap();
        let records = gateway.fetch_by_client("k1").await.unwrap();
        assert_eq!(records[0].payload, "https://ex.com/static-code");
    }

    #[tokio::test]
    async fn unreadable_composite_aborts_without_a_store_write() {
        let backend = Arc::new(MemoryStore::new());
        let gateway = gateway_over(backend.clone());

        // A minimum-size symbol is swallowed whole by the logo backing, so
        // the readability gate must reject it.
        let overlay = LogoOverlay {
            image: Some(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                64,
                64,
                Rgba([200, 30, 30, 255]),
            ))),
        };
        let mut p = params("https://ex.com", 4);
        p.size = Some(1);
        p.logo = Some(true);

        let result = issue_and_store(&gateway, &overlay, &p, "k1").await;
        assert!(matches!(result, Err(Error::NotReadable)));

        // Nothing was persisted and no id was consumed.
        assert!(backend.get("records/k1").await.unwrap().is_none());
        assert_eq!(gateway.next_id("k1").await.unwrap(), 0);
    }
}
