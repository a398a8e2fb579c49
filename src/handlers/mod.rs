pub mod card;
pub mod claim;
pub mod draw;
pub mod event;

pub use card::card_config;
pub use claim::claim_config;
pub use draw::draw_config;
pub use event::event_config;

use crate::error::AppError;
use crate::utils::AuthenticatedUser;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, web};
use serde_json::json;

/// Identity injected by the auth middleware.
pub(crate) fn current_user(req: &HttpRequest) -> Option<AuthenticatedUser> {
    req.extensions().get::<AuthenticatedUser>().copied()
}

/// Operator-only endpoints: event lifecycle, generation and draws.
pub(crate) fn require_organizer(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    match current_user(req) {
        Some(user) if user.is_organizer() => Ok(user),
        Some(_) => Err(AppError::Forbidden),
        None => Err(AppError::AuthError("Not authenticated".to_string())),
    }
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "bingo-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
