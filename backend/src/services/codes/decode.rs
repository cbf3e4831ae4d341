//! Decodes uploaded symbol images.
//!
//! Both routes accept a multipart upload with a `file` field holding the
//! image (PNG or JPEG). `/read` recovers the payload and returns it split
//! into URL parts; `/check` only answers whether the symbol is readable.

use crate::error::{Error, Result};
use crate::symbol::{codec, url};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, ResponseError};
use common::model::parsed_url::ParsedUrl;
use futures_util::StreamExt;
use image::DynamicImage;

pub async fn process(payload: Multipart) -> impl Responder {
    match read_and_parse(payload).await {
        Ok(parsed) => HttpResponse::Ok().json(parsed),
        Err(e) => e.error_response(),
    }
}

pub async fn check(payload: Multipart) -> impl Responder {
    match check_readable(payload).await {
        Ok(()) => HttpResponse::Ok().body("readable symbol"),
        Err(e) => e.error_response(),
    }
}

async fn check_readable(payload: Multipart) -> Result<()> {
    let image = read_uploaded_image(payload).await?;
    codec::decode(&image)?;
    Ok(())
}

/// Decodes the uploaded symbol and splits its payload into URL parts.
async fn read_and_parse(payload: Multipart) -> Result<ParsedUrl> {
    let image = read_uploaded_image(payload).await?;
    let decoded = codec::decode(&image)?;
    url::parse(&decoded)
}

/// Pulls the `file` field out of the multipart stream and loads it as an
/// image.
async fn read_uploaded_image(mut payload: Multipart) -> Result<DynamicImage> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| Error::InvalidArgument(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }
        file_bytes = Some(bytes);
    }

    let bytes = file_bytes.ok_or_else(|| Error::InvalidArgument("missing file field".into()))?;
    image::load_from_memory(&bytes).map_err(|e| Error::Decode(format!("not a readable image: {}", e)))
}
