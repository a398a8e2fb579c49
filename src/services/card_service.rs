use crate::entities::{
    EventStatus, FREE_SPACE, card_entity as cards, event_entity as events,
    subcard_cell_entity as cells, subcard_entity as subcards,
};
use crate::error::{AppError, AppResult};
use crate::external::{GenerateTicketsRequest, GeneratedCard, GeneratorClient};
use crate::models::{CardDetailResponse, CardResponse, GenerateCardsResponse, SubcardResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

const GRID_SIZE: usize = 5;

/// Rows per insert_many batch; a 2000-card event has 250k cells.
const CELL_INSERT_CHUNK: usize = 5000;

/// One-shot ingest of the generation collaborator's output. After this runs
/// the card/subcard/cell rows are immutable; the draw engine only reads
/// them.
#[derive(Clone)]
pub struct CardService {
    pool: DatabaseConnection,
    generator: GeneratorClient,
}

impl CardService {
    pub fn new(pool: DatabaseConnection, generator: GeneratorClient) -> Self {
        Self { pool, generator }
    }

    /// Generate and persist all cards for a draft event, then advance it to
    /// generated. The generator call happens before the transaction opens;
    /// the status is re-checked inside it, and the unique (event_id,
    /// card_index) index stops a double ingest that slips past the check.
    pub async fn generate_cards(&self, event_id: Uuid) -> AppResult<GenerateCardsResponse> {
        let event = events::Entity::find_by_id(event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))?;

        if !event.status.can_generate() {
            return Err(AppError::InvalidStateTransition {
                required: EventStatus::Draft,
                actual: event.status,
            });
        }

        let seed = event
            .seed
            .clone()
            .ok_or_else(|| AppError::InternalError("Event has no generation seed".into()))?;

        let response = self
            .generator
            .generate_tickets(&GenerateTicketsRequest {
                event_id,
                seed,
                total_cards: event.total_cards,
                rounds: event.total_rounds,
            })
            .await?;

        if response.cards.len() != event.total_cards as usize {
            return Err(AppError::ExternalApiError(format!(
                "Generator returned {} cards, expected {}",
                response.cards.len(),
                event.total_cards
            )));
        }

        let txn = self.pool.begin().await?;

        let event = events::Entity::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))?;
        if !event.status.can_generate() {
            return Err(AppError::InvalidStateTransition {
                required: EventStatus::Draft,
                actual: event.status,
            });
        }

        let mut card_ams = Vec::with_capacity(response.cards.len());
        let mut subcard_ams = Vec::new();
        let mut cell_ams = Vec::new();
        let mut subcard_count = 0usize;

        for card in &response.cards {
            card_ams.push(cards::ActiveModel {
                id: Set(card.card_id),
                event_id: Set(event_id),
                card_index: Set(card.card_index),
                qr_code: Set(card.qr_code.clone()),
                created_at: Set(Some(Utc::now())),
            });

            for generated in &card.subcards {
                let subcard_id = Uuid::new_v4();
                validate_grid(card, generated.round, &generated.grid)?;

                subcard_ams.push(subcards::ActiveModel {
                    id: Set(subcard_id),
                    card_id: Set(card.card_id),
                    event_id: Set(event_id),
                    round_number: Set(generated.round),
                    grid_hash: Set(generated.hash.clone()),
                    created_at: Set(Some(Utc::now())),
                });
                subcard_count += 1;

                for (row, values) in generated.grid.iter().enumerate() {
                    for (col, value) in values.iter().enumerate() {
                        let free = value == FREE_SPACE;
                        cell_ams.push(cells::ActiveModel {
                            id: NotSet,
                            subcard_id: Set(subcard_id),
                            row: Set(row as i16),
                            col: Set(col as i16),
                            value: Set(value.clone()),
                            // Free space starts marked; everything else
                            // waits for its number.
                            marked: Set(free),
                            marked_at: Set(free.then(Utc::now)),
                        });
                    }
                }
            }
        }

        cards::Entity::insert_many(card_ams).exec(&txn).await?;
        subcards::Entity::insert_many(subcard_ams).exec(&txn).await?;
        for chunk in cell_ams.chunks(CELL_INSERT_CHUNK) {
            cells::Entity::insert_many(chunk.to_vec()).exec(&txn).await?;
        }

        let generated_cards = response.cards.len();
        let mut am = event.into_active_model();
        am.status = Set(EventStatus::Generated);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Generated {generated_cards} cards ({subcard_count} subcards) for event {event_id}"
        );

        Ok(GenerateCardsResponse {
            event_id,
            status: updated.status.to_string(),
            generated_cards,
            generated_subcards: subcard_count,
        })
    }

    /// Resolve a public QR token to its card and per-round subcards.
    pub async fn get_card_by_qr(&self, qr_code: &str) -> AppResult<CardDetailResponse> {
        let card = cards::Entity::find()
            .filter(cards::Column::QrCode.eq(qr_code))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Card with QR '{qr_code}'")))?;

        let subcard_rows = subcards::Entity::find()
            .filter(subcards::Column::CardId.eq(card.id))
            .order_by_asc(subcards::Column::RoundNumber)
            .all(&self.pool)
            .await?;

        Ok(CardDetailResponse {
            card: CardResponse::from(card),
            subcards: subcard_rows
                .into_iter()
                .map(SubcardResponse::from)
                .collect(),
        })
    }
}

fn validate_grid(card: &GeneratedCard, round: i16, grid: &[Vec<String>]) -> AppResult<()> {
    let square = grid.len() == GRID_SIZE && grid.iter().all(|row| row.len() == GRID_SIZE);
    if !square {
        return Err(AppError::ExternalApiError(format!(
            "Generator produced a malformed grid for card {} round {round}",
            card.card_index
        )));
    }
    if grid[GRID_SIZE / 2][GRID_SIZE / 2] != FREE_SPACE {
        return Err(AppError::ExternalApiError(format!(
            "Grid center is not the free space for card {} round {round}",
            card.card_index
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> GeneratedCard {
        GeneratedCard {
            card_id: Uuid::new_v4(),
            card_index: 1,
            qr_code: "QR1".into(),
            subcards: vec![],
        }
    }

    fn grid_with_center(center: &str) -> Vec<Vec<String>> {
        let mut grid: Vec<Vec<String>> = (0..5)
            .map(|r| (0..5).map(|c| format!("{}", r * 5 + c + 1)).collect())
            .collect();
        grid[2][2] = center.to_string();
        grid
    }

    #[test]
    fn test_valid_grid_passes() {
        let card = sample_card();
        assert!(validate_grid(&card, 1, &grid_with_center(FREE_SPACE)).is_ok());
    }

    #[test]
    fn test_grid_without_free_center_is_rejected() {
        let card = sample_card();
        assert!(validate_grid(&card, 1, &grid_with_center("13")).is_err());
    }

    #[test]
    fn test_non_square_grid_is_rejected() {
        let card = sample_card();
        let mut grid = grid_with_center(FREE_SPACE);
        grid.pop();
        assert!(validate_grid(&card, 1, &grid).is_err());
    }
}
