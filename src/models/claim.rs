use crate::entities::bingo_claim_entity as claims;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClaimBingoRequest {
    pub subcard_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClaimQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub subcard_id: Uuid,
    pub claimed_by: Option<Uuid>,
    pub is_valid: bool,
    pub validated_at: Option<DateTime<Utc>>,
}

impl From<claims::Model> for ClaimResponse {
    fn from(model: claims::Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            subcard_id: model.subcard_id,
            claimed_by: model.claimed_by,
            is_valid: model.is_valid,
            validated_at: model.validated_at,
        }
    }
}
