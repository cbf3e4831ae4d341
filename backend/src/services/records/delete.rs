use crate::services::client_key;
use crate::store::gateway::StoreGateway;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};

/// Removes one record after checking it exists; surfaces 404 for an id
/// that was never issued or has already been deleted.
pub async fn process(
    req: HttpRequest,
    id: web::Path<u32>,
    gateway: web::Data<StoreGateway>,
) -> impl Responder {
    let client_key = match client_key(&req) {
        Ok(key) => key,
        Err(e) => return e.error_response(),
    };
    match gateway.delete_by_id(&client_key, id.into_inner()).await {
        Ok(()) => HttpResponse::Ok().body("record deleted"),
        Err(e) => e.error_response(),
    }
}
