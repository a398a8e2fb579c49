use crate::entities::winner_entity as winners;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WinnerResponse {
    pub round: i16,
    pub card_id: Uuid,
    pub subcard_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_index: Option<i32>,
    pub awarded_at: DateTime<Utc>,
}

impl From<winners::Model> for WinnerResponse {
    fn from(model: winners::Model) -> Self {
        Self {
            round: model.round_number,
            card_id: model.card_id,
            subcard_id: model.subcard_id,
            card_index: None,
            awarded_at: model.awarded_at,
        }
    }
}

/// Outcome of one DrawNext call. `winner` is set when this very draw
/// completed a subcard and the winner insert was accepted.
#[derive(Debug, Serialize, ToSchema)]
pub struct DrawResultResponse {
    pub event_id: Uuid,
    pub round: i16,
    pub number: i16,
    pub draw_order: i32,
    pub drawn_at: DateTime<Utc>,
    pub total_drawn: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<WinnerResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DrawStatusResponse {
    pub event_id: Uuid,
    pub round: i16,
    pub total_drawn: usize,
    pub drawn_numbers: Vec<i16>,
    /// Numbers still available event-wide.
    pub remaining: usize,
    pub has_winner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<WinnerResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DrawnNumbersResponse {
    pub event_id: Uuid,
    pub round: i16,
    pub numbers: Vec<i16>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StartDrawResponse {
    pub event_id: Uuid,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinishDrawResponse {
    pub event_id: Uuid,
    pub status: String,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_winners: usize,
}
