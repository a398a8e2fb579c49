use crate::handlers::current_user;
use crate::models::*;
use crate::services::ClaimService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/events/{event_id}/claims",
    tag = "claims",
    params(("event_id" = Uuid, Path, description = "Event id")),
    request_body = ClaimBingoRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Claim accepted", body = ClaimResponse),
        (status = 422, description = "Subcard is not fully marked"),
        (status = 409, description = "Duplicate claim or event not running")
    )
)]
/// ClaimBingo: server-side re-validation of a participant's completion
/// assertion. A valid claim is a receipt; it does not award the prize.
pub async fn claim_bingo(
    service: web::Data<ClaimService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ClaimBingoRequest>,
) -> Result<HttpResponse> {
    let claimant = current_user(&req).map(|user| user.id);
    match service
        .claim_bingo(path.into_inner(), body.subcard_id, claimant)
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_id}/claims",
    tag = "claims",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("page" = Option<u32>, Query, description = "Page (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated claims for the event, newest first")
    )
)]
pub async fn list_claims(
    service: web::Data<ClaimService>,
    path: web::Path<Uuid>,
    query: web::Query<ClaimQuery>,
) -> Result<HttpResponse> {
    match service.list_claims(path.into_inner(), &query.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn claim_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events/{event_id}/claims")
            .route("", web::post().to(claim_bingo))
            .route("", web::get().to(list_claims)),
    );
}
