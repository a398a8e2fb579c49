use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Literal stored in `value` for the pre-marked center cell.
pub const FREE_SPACE: &str = "FREE";

/// One cell of a subcard grid. `value` is the ball number as a string
/// ("1".."75") or [`FREE_SPACE`]. A cell goes unmarked -> marked exactly
/// once and never back; the center cell is created already marked.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "subcard_cells")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subcard_id: Uuid,
    pub row: i16,
    pub col: i16,
    pub value: String,
    pub marked: bool,
    pub marked_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subcards::Entity",
        from = "Column::SubcardId",
        to = "super::subcards::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Subcard,
}

impl Related<super::subcards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
