use crate::services::client_key;
use crate::store::gateway::StoreGateway;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};

/// Returns the calling client's records in id order. A client with no
/// records is a 404, matching the store's not-found semantics.
pub async fn process(req: HttpRequest, gateway: web::Data<StoreGateway>) -> impl Responder {
    let client_key = match client_key(&req) {
        Ok(key) => key,
        Err(e) => return e.error_response(),
    };
    match gateway.fetch_by_client(&client_key).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => e.error_response(),
    }
}
