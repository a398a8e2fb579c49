use crate::entities::{
    EventStatus, card_entity as cards, draw_entity as draws, event_entity as events,
    winner_entity as winners,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateEventRequest, EventResponse, EventResultsResponse, FinishDrawResponse,
    StartDrawResponse, UpdateEventRequest, WinnerResponse,
};
use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

/// Fixed by the domain: every event plays five rounds.
pub const DEFAULT_TOTAL_ROUNDS: i32 = 5;
pub const DEFAULT_TOTAL_CARDS: i32 = 2000;

/// Event lifecycle controller. Guards the monotonic status machine
/// draft -> generated -> running -> finished; every transition is an
/// explicit operator call, there are no timers.
#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
}

impl EventService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_event(
        &self,
        request: CreateEventRequest,
        created_by: Uuid,
    ) -> AppResult<EventResponse> {
        if let Some(total_cards) = request.total_cards {
            if total_cards < 1 {
                return Err(AppError::ValidationError(
                    "total_cards must be positive".into(),
                ));
            }
        }

        let model = events::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            description: Set(request.description),
            event_date: Set(request.event_date),
            location: Set(request.location),
            total_cards: Set(request.total_cards.unwrap_or(DEFAULT_TOTAL_CARDS)),
            total_rounds: Set(DEFAULT_TOTAL_ROUNDS),
            seed: Set(Some(generate_seed())),
            status: Set(EventStatus::Draft),
            created_by: Set(created_by),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Event created: {} ({})", model.name, model.id);

        Ok(model.into())
    }

    /// Configuration edits are only legal while the event is a draft.
    pub async fn update_event(
        &self,
        event_id: Uuid,
        request: UpdateEventRequest,
    ) -> AppResult<EventResponse> {
        let event = self.find_event(event_id).await?;

        if !event.status.is_draft() {
            return Err(AppError::InvalidStateTransition {
                required: EventStatus::Draft,
                actual: event.status,
            });
        }

        let mut am = event.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name);
        }
        if let Some(description) = request.description {
            am.description = Set(Some(description));
        }
        if let Some(event_date) = request.event_date {
            am.event_date = Set(event_date);
        }
        if let Some(location) = request.location {
            am.location = Set(Some(location));
        }
        if let Some(total_cards) = request.total_cards {
            if total_cards < 1 {
                return Err(AppError::ValidationError(
                    "total_cards must be positive".into(),
                ));
            }
            am.total_cards = Set(total_cards);
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn get_event(&self, event_id: Uuid) -> AppResult<EventResponse> {
        Ok(self.find_event(event_id).await?.into())
    }

    /// StartDraw: generated -> running.
    pub async fn start_draw(&self, event_id: Uuid) -> AppResult<StartDrawResponse> {
        let txn = self.pool.begin().await?;

        let event = events::Entity::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))?;

        if !event.status.can_start() {
            return Err(AppError::InvalidStateTransition {
                required: EventStatus::Generated,
                actual: event.status,
            });
        }

        let mut am = event.into_active_model();
        am.status = Set(EventStatus::Running);
        am.started_at = Set(Some(Utc::now()));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;

        txn.commit().await?;

        log::info!("Draw started for event {event_id}");

        Ok(StartDrawResponse {
            event_id: updated.id,
            status: updated.status.to_string(),
            started_at: updated.started_at,
        })
    }

    /// FinishDraw: running -> finished. Terminal; no further draws or claims.
    pub async fn finish_draw(&self, event_id: Uuid) -> AppResult<FinishDrawResponse> {
        let txn = self.pool.begin().await?;

        let event = events::Entity::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))?;

        if !event.status.is_running() {
            return Err(AppError::InvalidStateTransition {
                required: EventStatus::Running,
                actual: event.status,
            });
        }

        let mut am = event.into_active_model();
        am.status = Set(EventStatus::Finished);
        am.finished_at = Set(Some(Utc::now()));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;

        let total_winners = winners::Entity::find()
            .filter(winners::Column::EventId.eq(event_id))
            .count(&txn)
            .await? as usize;

        txn.commit().await?;

        log::info!("Draw finished for event {event_id} with {total_winners} winners");

        Ok(FinishDrawResponse {
            event_id: updated.id,
            status: updated.status.to_string(),
            finished_at: updated.finished_at,
            total_winners,
        })
    }

    /// GetResults: winners per round plus draw totals.
    pub async fn get_results(&self, event_id: Uuid) -> AppResult<EventResultsResponse> {
        let event = self.find_event(event_id).await?;

        let winner_rows = winners::Entity::find()
            .filter(winners::Column::EventId.eq(event_id))
            .order_by_asc(winners::Column::RoundNumber)
            .all(&self.pool)
            .await?;

        let total_draws = draws::Entity::find()
            .filter(draws::Column::EventId.eq(event_id))
            .count(&self.pool)
            .await?;

        let mut winner_responses = Vec::with_capacity(winner_rows.len());
        for row in winner_rows {
            let card_index = cards::Entity::find_by_id(row.card_id)
                .one(&self.pool)
                .await?
                .map(|c| c.card_index);
            let mut response = WinnerResponse::from(row);
            response.card_index = card_index;
            winner_responses.push(response);
        }

        Ok(EventResultsResponse {
            event_id: event.id,
            event_name: event.name,
            total_rounds: event.total_rounds,
            total_draws,
            total_winners: winner_responses.len(),
            winners: winner_responses,
        })
    }

    async fn find_event(&self, event_id: Uuid) -> AppResult<events::Model> {
        events::Entity::find_by_id(event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))
    }
}

/// Server-only seed for the generation collaborator. Random, never derived
/// from anything a client could predict, never serialized out.
fn generate_seed() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_seed_shape() {
        let seed = generate_seed();
        assert_eq!(seed.len(), 64);
        assert!(seed.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_seeds_differ() {
        assert_ne!(generate_seed(), generate_seed());
    }
}
