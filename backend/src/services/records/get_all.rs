use crate::store::gateway::StoreGateway;
use actix_web::{web, HttpResponse, Responder, ResponseError};

/// Returns every client's records, grouped by client key. An empty tree
/// is an empty map, not an error.
pub async fn process(gateway: web::Data<StoreGateway>) -> impl Responder {
    match gateway.fetch_all().await {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => e.error_response(),
    }
}
