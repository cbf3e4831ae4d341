use crate::services::client_key;
use crate::store::gateway::StoreGateway;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};

/// Unconditionally removes the calling client's whole collection. No
/// existence check; removing nothing still succeeds.
pub async fn process(req: HttpRequest, gateway: web::Data<StoreGateway>) -> impl Responder {
    let client_key = match client_key(&req) {
        Ok(key) => key,
        Err(e) => return e.error_response(),
    };
    match gateway.delete_all_for_client(&client_key).await {
        Ok(()) => HttpResponse::Ok().body("all records deleted"),
        Err(e) => e.error_response(),
    }
}
