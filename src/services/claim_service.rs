use crate::entities::{
    EventStatus, bingo_claim_entity as claims, event_entity as events,
    subcard_cell_entity as cells, subcard_entity as subcards,
};
use crate::error::{AppError, AppResult};
use crate::models::{ClaimQuery, ClaimResponse, PaginatedResponse, PaginationParams};
use crate::services::notifier::{Notification, NotificationPublisher};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

/// Claim validator. A participant's "I have bingo" is never trusted: the
/// cell state the draw engine maintains is re-counted server-side before a
/// claim row is recorded.
///
/// Claims are receipts, not awards. Winner rows are created exclusively by
/// the draw engine's detection step; a valid claim on its own never writes
/// to winners.
#[derive(Clone)]
pub struct ClaimService {
    pool: DatabaseConnection,
    publisher: NotificationPublisher,
}

impl ClaimService {
    pub fn new(pool: DatabaseConnection, publisher: NotificationPublisher) -> Self {
        Self { pool, publisher }
    }

    /// ClaimBingo for one subcard.
    pub async fn claim_bingo(
        &self,
        event_id: Uuid,
        subcard_id: Uuid,
        claimant: Option<Uuid>,
    ) -> AppResult<ClaimResponse> {
        let txn = self.pool.begin().await?;

        let event = events::Entity::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))?;

        let subcard = subcards::Entity::find_by_id(subcard_id)
            .one(&txn)
            .await?
            .filter(|s| s.event_id == event_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Subcard {subcard_id} in event {event_id}"))
            })?;

        // Ground truth: recount unmarked cells, same state the draw engine
        // maintains.
        let unmarked = cells::Entity::find()
            .filter(cells::Column::SubcardId.eq(subcard.id))
            .filter(cells::Column::Marked.eq(false))
            .count(&txn)
            .await?;

        let already_claimed = claims::Entity::find()
            .filter(claims::Column::SubcardId.eq(subcard.id))
            .one(&txn)
            .await?
            .is_some();

        validate_claim(event.status, unmarked, already_claimed)?;

        let model = claims::Model {
            id: Uuid::new_v4(),
            event_id,
            subcard_id: subcard.id,
            claimed_by: claimant,
            is_valid: true,
            validated_at: Some(Utc::now()),
            created_at: Some(Utc::now()),
        };

        // The unique index on subcard_id catches a racing claim the pre-read
        // above missed.
        let insert = claims::Entity::insert(claims::ActiveModel {
            id: Set(model.id),
            event_id: Set(model.event_id),
            subcard_id: Set(model.subcard_id),
            claimed_by: Set(model.claimed_by),
            is_valid: Set(model.is_valid),
            validated_at: Set(model.validated_at),
            created_at: Set(model.created_at),
        })
        .on_conflict(
            OnConflict::column(claims::Column::SubcardId)
                .do_nothing()
                .to_owned(),
        )
        .exec(&txn)
        .await;

        match insert {
            Ok(_) => {}
            Err(DbErr::RecordNotInserted) => return Err(AppError::DuplicateClaim),
            Err(e) => return Err(e.into()),
        }

        txn.commit().await?;

        log::info!(
            "Bingo claimed for subcard {} in event {} by {:?}",
            subcard.id,
            event_id,
            claimant
        );

        self.publisher.publish(Notification::BingoClaimed {
            event_id,
            subcard_id: subcard.id,
            claimed_by: claimant,
            validated_at: model.validated_at.unwrap_or_else(Utc::now),
        });

        Ok(model.into())
    }

    /// ListClaims for an event, newest first.
    pub async fn list_claims(
        &self,
        event_id: Uuid,
        query: &ClaimQuery,
    ) -> AppResult<PaginatedResponse<ClaimResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base_query = claims::Entity::find().filter(claims::Column::EventId.eq(event_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items = base_query
            .order_by(claims::Column::CreatedAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }
}

/// Claim preconditions over facts read inside the transaction: the event
/// must be running, the subcard fully marked, and no claim on it yet. Order
/// matters: a claim on an idle event is a state error even when the subcard
/// happens to be complete.
pub(crate) fn validate_claim(
    status: EventStatus,
    unmarked: u64,
    already_claimed: bool,
) -> AppResult<()> {
    if !status.is_running() {
        return Err(AppError::InvalidStateTransition {
            required: EventStatus::Running,
            actual: status,
        });
    }
    if unmarked > 0 {
        return Err(AppError::IncompleteCard { unmarked });
    }
    if already_claimed {
        return Err(AppError::DuplicateClaim);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_requires_running_event() {
        for status in [
            EventStatus::Draft,
            EventStatus::Generated,
            EventStatus::Finished,
        ] {
            match validate_claim(status, 0, false) {
                Err(AppError::InvalidStateTransition { required, actual }) => {
                    assert_eq!(required, EventStatus::Running);
                    assert_eq!(actual, status);
                }
                other => panic!("expected state error for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_incomplete_subcard_is_rejected_with_count() {
        // 2 of 25 cells still unmarked.
        match validate_claim(EventStatus::Running, 2, false) {
            Err(AppError::IncompleteCard { unmarked }) => assert_eq!(unmarked, 2),
            other => panic!("expected IncompleteCard, got {other:?}"),
        }
    }

    #[test]
    fn test_any_unmarked_cell_blocks_claim() {
        for unmarked in 1..=24u64 {
            assert!(matches!(
                validate_claim(EventStatus::Running, unmarked, false),
                Err(AppError::IncompleteCard { .. })
            ));
        }
    }

    #[test]
    fn test_claimed_subcard_is_rejected() {
        assert!(matches!(
            validate_claim(EventStatus::Running, 0, true),
            Err(AppError::DuplicateClaim)
        ));
    }

    #[test]
    fn test_complete_unclaimed_subcard_passes() {
        assert!(validate_claim(EventStatus::Running, 0, false).is_ok());
    }
}
