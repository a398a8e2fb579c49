use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::EventStatus;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::event::create_event,
        handlers::event::get_event,
        handlers::event::update_event,
        handlers::event::start_draw,
        handlers::event::finish_draw,
        handlers::event::get_results,
        handlers::card::generate_cards,
        handlers::card::get_card_by_qr,
        handlers::draw::draw_number,
        handlers::draw::get_draw_status,
        handlers::draw::list_drawn_numbers,
        handlers::draw::get_winner,
        handlers::claim::claim_bingo,
        handlers::claim::list_claims,
    ),
    components(
        schemas(
            EventStatus,
            CreateEventRequest,
            UpdateEventRequest,
            EventResponse,
            EventResultsResponse,
            CardResponse,
            SubcardResponse,
            CardDetailResponse,
            GenerateCardsResponse,
            WinnerResponse,
            DrawResultResponse,
            DrawStatusResponse,
            DrawnNumbersResponse,
            StartDrawResponse,
            FinishDrawResponse,
            ClaimBingoRequest,
            ClaimResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "events", description = "Event lifecycle API"),
        (name = "cards", description = "Card generation and lookup API"),
        (name = "draw", description = "Number draw API"),
        (name = "claims", description = "Bingo claim API"),
    ),
    info(
        title = "Bingo Backend API",
        version = "1.0.0",
        description = "Live bingo draw and claim REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
