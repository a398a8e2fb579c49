use crate::handlers::require_organizer;
use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/events/{event_id}/draw/{round}",
    tag = "draw",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("round" = i32, Path, description = "Round number, 1-based")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number drawn", body = DrawResultResponse),
        (status = 409, description = "Event not running or number space exhausted"),
        (status = 400, description = "Round out of range")
    )
)]
/// DrawNext: reveal the next number for a round. Atomic: the draw row, all
/// cell marks and winner detection commit together or not at all.
pub async fn draw_number(
    service: web::Data<DrawService>,
    req: HttpRequest,
    path: web::Path<(Uuid, i32)>,
) -> Result<HttpResponse> {
    if let Err(e) = require_organizer(&req) {
        return Ok(e.error_response());
    }
    let (event_id, round) = path.into_inner();
    match service.draw_next(event_id, round).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_id}/draw/{round}/status",
    tag = "draw",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("round" = i32, Path, description = "Round number, 1-based")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current round state", body = DrawStatusResponse)
    )
)]
/// GetDrawStatus: drawn numbers, remaining space and winner so far.
pub async fn get_draw_status(
    service: web::Data<DrawService>,
    path: web::Path<(Uuid, i32)>,
) -> Result<HttpResponse> {
    let (event_id, round) = path.into_inner();
    match service.get_draw_status(event_id, round).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_id}/draw/{round}/numbers",
    tag = "draw",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("round" = i32, Path, description = "Round number, 1-based")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Numbers in draw order", body = DrawnNumbersResponse)
    )
)]
pub async fn list_drawn_numbers(
    service: web::Data<DrawService>,
    path: web::Path<(Uuid, i32)>,
) -> Result<HttpResponse> {
    let (event_id, round) = path.into_inner();
    match service.list_drawn_numbers(event_id, round).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_id}/draw/{round}/winner",
    tag = "draw",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("round" = i32, Path, description = "Round number, 1-based")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Round winner", body = WinnerResponse),
        (status = 404, description = "No winner yet")
    )
)]
pub async fn get_winner(
    service: web::Data<DrawService>,
    path: web::Path<(Uuid, i32)>,
) -> Result<HttpResponse> {
    let (event_id, round) = path.into_inner();
    match service.get_winner(event_id, round).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events/{event_id}/draw")
            .route("/{round}", web::post().to(draw_number))
            .route("/{round}/status", web::get().to(get_draw_status))
            .route("/{round}/numbers", web::get().to(list_drawn_numbers))
            .route("/{round}/winner", web::get().to(get_winner)),
    );
}
