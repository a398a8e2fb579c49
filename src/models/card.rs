use crate::entities::{card_entity as cards, subcard_entity as subcards};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub card_index: i32,
    pub qr_code: String,
}

impl From<cards::Model> for CardResponse {
    fn from(model: cards::Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            card_index: model.card_index,
            qr_code: model.qr_code,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubcardResponse {
    pub id: Uuid,
    pub card_id: Uuid,
    pub round_number: i16,
    pub grid_hash: String,
}

impl From<subcards::Model> for SubcardResponse {
    fn from(model: subcards::Model) -> Self {
        Self {
            id: model.id,
            card_id: model.card_id,
            round_number: model.round_number,
            grid_hash: model.grid_hash,
        }
    }
}

/// A card with its per-round subcards, as resolved from a QR token.
#[derive(Debug, Serialize, ToSchema)]
pub struct CardDetailResponse {
    pub card: CardResponse,
    pub subcards: Vec<SubcardResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateCardsResponse {
    pub event_id: Uuid,
    pub status: String,
    pub generated_cards: usize,
    pub generated_subcards: usize,
}
