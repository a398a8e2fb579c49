use crate::handlers::require_organizer;
use crate::models::*;
use crate::services::CardService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/events/{event_id}/generate-cards",
    tag = "cards",
    params(("event_id" = Uuid, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cards generated", body = GenerateCardsResponse),
        (status = 409, description = "Event is not a draft"),
        (status = 502, description = "Generator service failure")
    )
)]
/// Invoke the generation collaborator once and persist its grids. Moves the
/// event from draft to generated.
pub async fn generate_cards(
    service: web::Data<CardService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if let Err(e) = require_organizer(&req) {
        return Ok(e.error_response());
    }
    match service.generate_cards(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/cards/qr/{qr_code}",
    tag = "cards",
    params(("qr_code" = String, Path, description = "Public card token")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Card with its subcards", body = CardDetailResponse),
        (status = 404, description = "Unknown QR token")
    )
)]
pub async fn get_card_by_qr(
    service: web::Data<CardService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.get_card_by_qr(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn card_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/generate-cards",
        web::post().to(generate_cards),
    )
    .route("/cards/qr/{qr_code}", web::get().to(get_card_by_qr));
}
