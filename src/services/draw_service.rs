use crate::entities::{
    EventStatus, draw_entity as draws, event_entity as events, subcard_cell_entity as cells,
    subcard_entity as subcards, winner_entity as winners,
};
use crate::error::{AppError, AppResult};
use crate::models::{DrawResultResponse, DrawStatusResponse, DrawnNumbersResponse, WinnerResponse};
use crate::services::notifier::{Notification, NotificationPublisher};
use chrono::Utc;
use rand::Rng;
use sea_orm::sea_query::{Expr, OnConflict, Query, SelectStatement};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashSet;
use uuid::Uuid;

/// Ball space is 1..=75 for every event.
pub const MAX_BALL: i16 = 75;

/// Bounded retries when a concurrent draw takes our number first.
const MAX_PICK_ATTEMPTS: usize = 5;

/// The draw engine: picks an unused number, persists it, bulk-marks matching
/// cells, detects coverage bingo and resolves the round winner inside one
/// store transaction. Concurrency control is the unique indexes on
/// (event_id, number), (event_id, round_number, draw_order) and
/// (event_id, round_number); losing a race is a defined outcome, not an
/// error.
#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
    publisher: NotificationPublisher,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection, publisher: NotificationPublisher) -> Self {
        Self { pool, publisher }
    }

    /// DrawNext: reveal one number for (event, round).
    ///
    /// Either the whole unit commits (draw row + cell marks + winner
    /// detection) or none of it is visible. The notification goes out only
    /// after the commit and is best-effort.
    pub async fn draw_next(&self, event_id: Uuid, round: i32) -> AppResult<DrawResultResponse> {
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
        if round < 1 || round > event.total_rounds {
            return Err(AppError::InvalidRound {
                round,
                total_rounds: event.total_rounds,
            });
        }
        let round = round as i16;

        let (draw, total_drawn) = self.secure_number(&txn, event_id, round).await?;

        // Mark every unmarked cell of this round carrying the drawn number.
        // One bulk statement; this touches thousands of rows on big events.
        let touched: Vec<Uuid> = cells::Entity::find()
            .select_only()
            .column(cells::Column::SubcardId)
            .distinct()
            .filter(cells::Column::Value.eq(draw.number.to_string()))
            .filter(cells::Column::SubcardId.in_subquery(round_subcards_query(event_id, round)))
            .into_tuple()
            .all(&txn)
            .await?;

        let mut winner = None;
        if !touched.is_empty() {
            cells::Entity::update_many()
                .col_expr(cells::Column::Marked, Expr::value(true))
                .col_expr(cells::Column::MarkedAt, Expr::value(draw.drawn_at))
                .filter(cells::Column::Value.eq(draw.number.to_string()))
                .filter(cells::Column::Marked.eq(false))
                .filter(cells::Column::SubcardId.in_subquery(round_subcards_query(event_id, round)))
                .exec(&txn)
                .await?;

            winner = self
                .record_winner_if_complete(&txn, event_id, round, &touched)
                .await?;
        }

        txn.commit().await?;

        log::info!(
            "Drew number {} (order {}) in round {} for event {}",
            draw.number,
            draw.draw_order,
            round,
            event_id
        );

        self.publisher.publish(Notification::NumberDrawn {
            event_id,
            round,
            number: draw.number,
            draw_order: draw.draw_order,
            drawn_at: draw.drawn_at,
        });

        Ok(DrawResultResponse {
            event_id,
            round,
            number: draw.number,
            draw_order: draw.draw_order,
            drawn_at: draw.drawn_at,
            total_drawn,
            winner: winner.map(WinnerResponse::from),
        })
    }

    /// GetDrawStatus: drawn numbers in order, remaining space, winner so far.
    /// Read-only; repeated calls without an intervening draw are identical.
    pub async fn get_draw_status(
        &self,
        event_id: Uuid,
        round: i32,
    ) -> AppResult<DrawStatusResponse> {
        let event = self.find_event(event_id).await?;
        let round = self.validate_round(&event, round)?;

        let drawn_numbers = self.round_numbers(event_id, round).await?;

        let total_event_wide = draws::Entity::find()
            .filter(draws::Column::EventId.eq(event_id))
            .count(&self.pool)
            .await? as usize;

        let winner = winners::Entity::find()
            .filter(winners::Column::EventId.eq(event_id))
            .filter(winners::Column::RoundNumber.eq(round))
            .one(&self.pool)
            .await?;

        Ok(DrawStatusResponse {
            event_id,
            round,
            total_drawn: drawn_numbers.len(),
            drawn_numbers,
            remaining: MAX_BALL as usize - total_event_wide,
            has_winner: winner.is_some(),
            winner: winner.map(WinnerResponse::from),
        })
    }

    /// ListDrawnNumbers: ordered numbers for one round.
    pub async fn list_drawn_numbers(
        &self,
        event_id: Uuid,
        round: i32,
    ) -> AppResult<DrawnNumbersResponse> {
        let event = self.find_event(event_id).await?;
        let round = self.validate_round(&event, round)?;

        Ok(DrawnNumbersResponse {
            event_id,
            round,
            numbers: self.round_numbers(event_id, round).await?,
        })
    }

    /// GetWinner for a round.
    pub async fn get_winner(&self, event_id: Uuid, round: i32) -> AppResult<WinnerResponse> {
        let event = self.find_event(event_id).await?;
        let round = self.validate_round(&event, round)?;

        winners::Entity::find()
            .filter(winners::Column::EventId.eq(event_id))
            .filter(winners::Column::RoundNumber.eq(round))
            .one(&self.pool)
            .await?
            .map(WinnerResponse::from)
            .ok_or_else(|| AppError::NotFound(format!("No winner yet for round {round}")))
    }

    /// Pick an unused number and persist the draw row. Two unique indexes
    /// arbitrate concurrent picks: (event_id, number) catches a racer taking
    /// the same number, (event_id, round_number, draw_order) catches a racer
    /// taking the same sequence position. Either rejection means re-read the
    /// drawn set and try again with fresh values.
    async fn secure_number(
        &self,
        txn: &DatabaseTransaction,
        event_id: Uuid,
        round: i16,
    ) -> AppResult<(draws::Model, u64)> {
        for _ in 0..MAX_PICK_ATTEMPTS {
            let drawn: Vec<(i16, i16)> = draws::Entity::find()
                .select_only()
                .column(draws::Column::Number)
                .column(draws::Column::RoundNumber)
                .filter(draws::Column::EventId.eq(event_id))
                .into_tuple()
                .all(txn)
                .await?;

            let numbers: Vec<i16> = drawn.iter().map(|(n, _)| *n).collect();
            let available = available_numbers(&numbers);
            if available.is_empty() {
                return Err(AppError::ExhaustedNumberSpace);
            }

            let number = available[rand::thread_rng().gen_range(0..available.len())];
            let draw_order = next_draw_order(&drawn, round);

            let model = draws::Model {
                id: Uuid::new_v4(),
                event_id,
                round_number: round,
                number,
                draw_order,
                drawn_at: Utc::now(),
            };

            let insert = draws::Entity::insert(draws::ActiveModel {
                id: Set(model.id),
                event_id: Set(model.event_id),
                round_number: Set(model.round_number),
                number: Set(model.number),
                draw_order: Set(model.draw_order),
                drawn_at: Set(model.drawn_at),
            })
            // Targetless: a rejection on any arbiter index (same number or
            // same sequence position) must come back as not-inserted rather
            // than abort the transaction.
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .exec(txn)
            .await;

            match insert {
                Ok(_) => {
                    return Ok((model, draw_order as u64));
                }
                Err(DbErr::RecordNotInserted) => {
                    log::warn!(
                        "Draw of {number} (order {draw_order}) for event {event_id} lost a race, retrying"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::InternalError(
            "Failed to secure a number after several attempts".into(),
        ))
    }

    /// Coverage-bingo detection over the subcards touched by this draw.
    /// Winner insertion relies on the (event_id, round_number) unique index:
    /// a rejected insert means this round already has its winner.
    async fn record_winner_if_complete(
        &self,
        txn: &DatabaseTransaction,
        event_id: Uuid,
        round: i16,
        touched: &[Uuid],
    ) -> AppResult<Option<winners::Model>> {
        let still_unmarked: Vec<Uuid> = cells::Entity::find()
            .select_only()
            .column(cells::Column::SubcardId)
            .distinct()
            .filter(cells::Column::SubcardId.is_in(touched.to_vec()))
            .filter(cells::Column::Marked.eq(false))
            .into_tuple()
            .all(txn)
            .await?;

        let completed = completed_subcards(touched, &still_unmarked);
        if completed.is_empty() {
            return Ok(None);
        }

        let completed_models = subcards::Entity::find()
            .filter(subcards::Column::Id.is_in(completed))
            .all(txn)
            .await?;

        for subcard in completed_models {
            log::info!(
                "Coverage bingo on subcard {} in round {round} for event {event_id}",
                subcard.id
            );

            let model = winners::Model {
                id: Uuid::new_v4(),
                event_id,
                subcard_id: subcard.id,
                card_id: subcard.card_id,
                round_number: round,
                prize_description: None,
                awarded_at: Utc::now(),
            };

            let insert = winners::Entity::insert(winners::ActiveModel {
                id: Set(model.id),
                event_id: Set(model.event_id),
                subcard_id: Set(model.subcard_id),
                card_id: Set(model.card_id),
                round_number: Set(model.round_number),
                prize_description: Set(None),
                awarded_at: Set(model.awarded_at),
            })
            .on_conflict(
                OnConflict::columns([winners::Column::EventId, winners::Column::RoundNumber])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(txn)
            .await;

            match insert {
                Ok(_) => return Ok(Some(model)),
                Err(DbErr::RecordNotInserted) => {
                    // Someone already won this round; absorbed, not an error.
                    log::info!("Winner already recorded for round {round} of event {event_id}");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(None)
    }

    async fn round_numbers(&self, event_id: Uuid, round: i16) -> AppResult<Vec<i16>> {
        let numbers: Vec<i16> = draws::Entity::find()
            .select_only()
            .column(draws::Column::Number)
            .filter(draws::Column::EventId.eq(event_id))
            .filter(draws::Column::RoundNumber.eq(round))
            .order_by_asc(draws::Column::DrawOrder)
            .into_tuple()
            .all(&self.pool)
            .await?;
        Ok(numbers)
    }

    async fn find_event(&self, event_id: Uuid) -> AppResult<events::Model> {
        events::Entity::find_by_id(event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))
    }

    fn validate_round(&self, event: &events::Model, round: i32) -> AppResult<i16> {
        if round < 1 || round > event.total_rounds {
            return Err(AppError::InvalidRound {
                round,
                total_rounds: event.total_rounds,
            });
        }
        Ok(round as i16)
    }
}

/// Subcards of one event/round, for cell filters.
fn round_subcards_query(event_id: Uuid, round: i16) -> SelectStatement {
    Query::select()
        .column(subcards::Column::Id)
        .from(subcards::Entity)
        .and_where(subcards::Column::EventId.eq(event_id))
        .and_where(subcards::Column::RoundNumber.eq(round))
        .to_owned()
}

/// Next 1-based position in the round's sequence, from (number, round)
/// pairs of every draw the event has seen. Rows of other rounds do not
/// advance it.
pub(crate) fn next_draw_order(drawn: &[(i16, i16)], round: i16) -> i32 {
    drawn.iter().filter(|(_, r)| *r == round).count() as i32 + 1
}

/// 1..=75 minus everything already drawn for the event (across rounds).
pub(crate) fn available_numbers(drawn: &[i16]) -> Vec<i16> {
    let taken: HashSet<i16> = drawn.iter().copied().collect();
    (1..=MAX_BALL).filter(|n| !taken.contains(n)).collect()
}

/// Touched subcards with no unmarked cell left: coverage bingo.
pub(crate) fn completed_subcards(touched: &[Uuid], still_unmarked: &[Uuid]) -> Vec<Uuid> {
    let unmarked: HashSet<Uuid> = still_unmarked.iter().copied().collect();
    touched
        .iter()
        .filter(|id| !unmarked.contains(id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_numbers_full_space() {
        let available = available_numbers(&[]);
        assert_eq!(available.len(), 75);
        assert_eq!(available.first(), Some(&1));
        assert_eq!(available.last(), Some(&75));
    }

    #[test]
    fn test_available_numbers_excludes_drawn_across_rounds() {
        // Numbers drawn in any round are gone for the whole event.
        let available = available_numbers(&[7, 23, 41, 75]);
        assert_eq!(available.len(), 71);
        assert!(!available.contains(&7));
        assert!(!available.contains(&23));
        assert!(!available.contains(&41));
        assert!(!available.contains(&75));
    }

    #[test]
    fn test_number_space_exhausts_after_75_draws() {
        let drawn: Vec<i16> = (1..=75).collect();
        assert!(available_numbers(&drawn).is_empty());

        let almost: Vec<i16> = (1..=74).collect();
        assert_eq!(available_numbers(&almost), vec![75]);
    }

    #[test]
    fn test_random_pick_stays_in_available_set() {
        let available = available_numbers(&[1, 2, 3]);
        for _ in 0..100 {
            let number = available[rand::thread_rng().gen_range(0..available.len())];
            assert!((4..=75).contains(&number));
        }
    }

    #[test]
    fn test_draw_order_is_sequential_per_round() {
        assert_eq!(next_draw_order(&[], 1), 1);

        // Three draws in round 1, one in round 2.
        let drawn = vec![(12i16, 1i16), (55, 1), (7, 1), (30, 2)];
        assert_eq!(next_draw_order(&drawn, 1), 4);
        assert_eq!(next_draw_order(&drawn, 2), 2);
        assert_eq!(next_draw_order(&drawn, 3), 1);
    }

    #[test]
    fn test_racing_draws_from_same_snapshot_collide_on_order() {
        // Two draws computed from the same snapshot claim the same position;
        // only one can hold it, the loser re-reads and lands on the next.
        let snapshot = vec![(12i16, 1i16), (55, 1), (7, 1)];
        let first = next_draw_order(&snapshot, 1);
        let second = next_draw_order(&snapshot, 1);
        assert_eq!(first, second);

        // After the winner's row is visible the re-read yields the follower.
        let mut after_winner = snapshot.clone();
        after_winner.push((23, 1));
        assert_eq!(next_draw_order(&after_winner, 1), first + 1);
    }

    #[test]
    fn test_completed_subcards_is_touched_minus_unmarked() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let completed = completed_subcards(&[a, b, c], &[b]);
        assert_eq!(completed, vec![a, c]);

        assert!(completed_subcards(&[a, b], &[a, b]).is_empty());
        assert_eq!(completed_subcards(&[a], &[]), vec![a]);
    }

    #[test]
    fn test_subcard_completes_only_after_last_needed_number() {
        // Subcard whose only unmarked cells hold 7, 23 and 41: it must not
        // complete until all three have been drawn.
        let subcard = Uuid::new_v4();
        let mut needed: HashSet<i16> = [7, 23, 41].into_iter().collect();

        for number in [7i16, 23, 41] {
            // Before this draw the subcard still has unmarked cells.
            assert!(!needed.is_empty());
            assert!(completed_subcards(&[subcard], &[subcard]).is_empty());

            needed.remove(&number);
            if !needed.is_empty() {
                continue;
            }

            // Third draw: nothing unmarked remains, coverage bingo.
            assert_eq!(completed_subcards(&[subcard], &[]), vec![subcard]);
        }
        assert!(needed.is_empty());
    }
}
