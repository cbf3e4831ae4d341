//! Renders and verifies a symbol without persisting anything.
//!
//! Useful for checking how a payload renders (with or without the logo
//! overlay) before committing to an issuance. Runs the same readability
//! gate as the persisting paths.

use crate::error::Result;
use crate::services::codes::pipeline::{render_verified, IssueParams, LogoOverlay};
use crate::symbol::codec;
use actix_web::{web, HttpResponse, Responder, ResponseError};

pub async fn process(
    params: web::Query<IssueParams>,
    overlay: web::Data<LogoOverlay>,
) -> impl Responder {
    match render_preview(&params, &overlay) {
        Ok(png) => HttpResponse::Ok().content_type("image/png").body(png),
        Err(e) => e.error_response(),
    }
}

fn render_preview(params: &IssueParams, overlay: &LogoOverlay) -> Result<Vec<u8>> {
    let symbol = render_verified(&params.url, params, overlay)?;
    codec::to_png_bytes(&symbol)
}
