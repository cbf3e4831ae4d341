//! Regenerates a code and overwrites an existing record in place.

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
    id: web::Path<u32>,
    params: web::Query<IssueParams>,
    gateway: web::Data<StoreGateway>,
    overlay: web::Data<LogoOverlay>,
) -> impl Responder {
    let client_key = match client_key(&req) {
        Ok(key) => key,
        Err(e) => return e.error_response(),
    };
    match issue_and_update(&gateway, &overlay, &params, &client_key, id.into_inner()).await {
        Ok(()) => HttpResponse::Ok().body("record updated"),
        Err(e) => e.error_response(),
    }
}

/// The update path of the issuance pipeline.
///
/// Unlike the create path, the sequential id is caller-supplied and never
/// re-allocated; even self-managed variants embed the id given here. The
/// gateway's existence check surfaces `NotFound` for an id that was never
/// issued (or has been deleted).
pub async fn issue_and_update(
    gateway: &StoreGateway,
    overlay: &LogoOverlay,
    params: &IssueParams,
    client_key: &str,
    id: u32,
) -> Result<()> {
    let payload = if params.variant()?.embeds_identity() {
        build_payload(params, client_key, Some(id))?
    } else {
        build_payload(params, client_key, None)?
    };

    let symbol = render_verified(&payload, params, overlay)?;
    let png = codec::to_png_bytes(&symbol)?;

    let record = build_record(params, payload, &png)?;
    gateway.update_by_id(client_key, id, &record).await?;
    info!("updated code {} for client {}", id, client_key);
    Ok(())
}
