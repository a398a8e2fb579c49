use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One 5x5 grid per (card, round). `grid_hash` is the generator's content
/// hash of the grid, kept for integrity checks and audit.
/// `event_id` is denormalized from the card so the draw path can filter
/// subcards for an event/round without joining through cards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "subcards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub card_id: Uuid,
    pub event_id: Uuid,
    pub round_number: i16,
    pub grid_hash: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cards::Entity",
        from = "Column::CardId",
        to = "super::cards::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Card,
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Event,
    #[sea_orm(has_many = "super::subcard_cells::Entity")]
    Cells,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl Related<super::subcard_cells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
