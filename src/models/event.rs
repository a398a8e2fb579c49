use crate::entities::{EventStatus, event_entity as events};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    /// Defaults to 2000 cards when omitted.
    pub total_cards: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub total_cards: Option<i32>,
}

/// Client-facing event view. The server-side seed is intentionally not part
/// of this model.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub total_cards: i32,
    pub total_rounds: i32,
    pub status: EventStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<events::Model> for EventResponse {
    fn from(model: events::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            event_date: model.event_date,
            location: model.location,
            total_cards: model.total_cards,
            total_rounds: model.total_rounds,
            status: model.status,
            started_at: model.started_at,
            finished_at: model.finished_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResultsResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub total_rounds: i32,
    pub total_draws: u64,
    pub total_winners: usize,
    pub winners: Vec<super::WinnerResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_response_carries_no_seed() {
        let model = events::Model {
            id: Uuid::new_v4(),
            name: "Spring Bingo".into(),
            description: None,
            event_date: Utc::now(),
            location: None,
            total_cards: 2000,
            total_rounds: 5,
            seed: Some("super-secret".into()),
            status: EventStatus::Draft,
            created_by: Uuid::new_v4(),
            started_at: None,
            finished_at: None,
            created_at: None,
            updated_at: None,
        };

        let response = EventResponse::from(model);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("seed"));
        assert!(!json.contains("super-secret"));
        assert!(json.contains("Spring Bingo"));
    }
}
