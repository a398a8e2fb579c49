use crate::handlers::require_organizer;
use crate::models::*;
use crate::services::EventService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event created", body = EventResponse),
        (status = 403, description = "Requires organizer role")
    )
)]
/// Create a draft event. The per-event generation seed is created here and
/// never leaves the server.
pub async fn create_event(
    service: web::Data<EventService>,
    req: HttpRequest,
    body: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    let user = match require_organizer(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match service.create_event(body.into_inner(), user.id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_id}",
    tag = "events",
    params(("event_id" = Uuid, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 404, description = "Unknown event")
    )
)]
pub async fn get_event(
    service: web::Data<EventService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match service.get_event(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/events/{event_id}",
    tag = "events",
    params(("event_id" = Uuid, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 409, description = "Event is no longer a draft")
    )
)]
/// Update event configuration. Only legal while the event is a draft.
pub async fn update_event(
    service: web::Data<EventService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_organizer(&req) {
        return Ok(e.error_response());
    }
    match service.update_event(path.into_inner(), body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{event_id}/start",
    tag = "events",
    params(("event_id" = Uuid, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Draw started", body = StartDrawResponse),
        (status = 409, description = "Event is not in generated status")
    )
)]
/// StartDraw: move a generated event to running.
pub async fn start_draw(
    service: web::Data<EventService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if let Err(e) = require_organizer(&req) {
        return Ok(e.error_response());
    }
    match service.start_draw(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{event_id}/finish",
    tag = "events",
    params(("event_id" = Uuid, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Draw finished", body = FinishDrawResponse),
        (status = 409, description = "Event is not running")
    )
)]
/// FinishDraw: terminal transition; no further draws or claims.
pub async fn finish_draw(
    service: web::Data<EventService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if let Err(e) = require_organizer(&req) {
        return Ok(e.error_response());
    }
    match service.finish_draw(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_id}/results",
    tag = "events",
    params(("event_id" = Uuid, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Winners and draw totals", body = EventResultsResponse),
        (status = 404, description = "Unknown event")
    )
)]
pub async fn get_results(
    service: web::Data<EventService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match service.get_results(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn event_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::post().to(create_event))
            .route("/{event_id}", web::get().to(get_event))
            .route("/{event_id}", web::put().to(update_event))
            .route("/{event_id}/start", web::post().to(start_draw))
            .route("/{event_id}/finish", web::post().to(finish_draw))
            .route("/{event_id}/results", web::get().to(get_results)),
    );
}
