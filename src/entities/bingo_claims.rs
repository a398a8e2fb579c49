use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Participant-submitted "I have bingo" assertion, re-verified server-side
/// before it is recorded. At most one claim per subcard (unique index).
/// `claimed_by` is nullable so an operator can log a claim for an on-site
/// player without a digital identity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bingo_claims")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub subcard_id: Uuid,
    pub claimed_by: Option<Uuid>,
    pub is_valid: bool,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::subcards::Entity",
        from = "Column::SubcardId",
        to = "super::subcards::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Subcard,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
