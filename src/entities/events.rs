use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "generated")]
    Generated,
    #[sea_orm(string_value = "running")]
    Running,
    #[sea_orm(string_value = "finished")]
    Finished,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Draft => write!(f, "draft"),
            EventStatus::Generated => write!(f, "generated"),
            EventStatus::Running => write!(f, "running"),
            EventStatus::Finished => write!(f, "finished"),
        }
    }
}

impl EventStatus {
    pub fn is_draft(&self) -> bool {
        matches!(self, EventStatus::Draft)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, EventStatus::Running)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, EventStatus::Finished)
    }

    /// Card generation is only legal while the event is still editable.
    pub fn can_generate(&self) -> bool {
        matches!(self, EventStatus::Draft)
    }

    /// The live draw may only start once cards exist.
    pub fn can_start(&self) -> bool {
        matches!(self, EventStatus::Generated)
    }

    /// Status only ever moves forward: draft -> generated -> running -> finished.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Draft, EventStatus::Generated)
                | (EventStatus::Generated, EventStatus::Running)
                | (EventStatus::Running, EventStatus::Finished)
        )
    }
}

/// Bingo event. `seed` is server-only material for the generation
/// collaborator and is deliberately absent from every response model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub total_cards: i32,
    pub total_rounds: i32,
    pub seed: Option<String>,
    pub status: EventStatus,
    pub created_by: Uuid,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cards::Entity")]
    Cards,
    #[sea_orm(has_many = "super::draws::Entity")]
    Draws,
    #[sea_orm(has_many = "super::winners::Entity")]
    Winners,
    #[sea_orm(has_many = "super::bingo_claims::Entity")]
    BingoClaims,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::draws::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Draws.def()
    }
}

impl Related<super::winners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Winners.def()
    }
}

impl Related<super::bingo_claims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BingoClaims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_are_monotonic() {
        assert!(EventStatus::Draft.can_transition_to(EventStatus::Generated));
        assert!(EventStatus::Generated.can_transition_to(EventStatus::Running));
        assert!(EventStatus::Running.can_transition_to(EventStatus::Finished));

        // No backward or skipping transitions.
        assert!(!EventStatus::Generated.can_transition_to(EventStatus::Draft));
        assert!(!EventStatus::Running.can_transition_to(EventStatus::Generated));
        assert!(!EventStatus::Draft.can_transition_to(EventStatus::Running));
        assert!(!EventStatus::Finished.can_transition_to(EventStatus::Running));
        assert!(!EventStatus::Draft.can_transition_to(EventStatus::Finished));
    }

    #[test]
    fn test_status_guards() {
        assert!(EventStatus::Draft.can_generate());
        assert!(!EventStatus::Generated.can_generate());
        assert!(EventStatus::Generated.can_start());
        assert!(!EventStatus::Running.can_start());
        assert!(EventStatus::Running.is_running());
        assert!(!EventStatus::Finished.is_running());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(EventStatus::Draft.to_string(), "draft");
        assert_eq!(EventStatus::Finished.to_string(), "finished");
    }
}
