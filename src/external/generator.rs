use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client for the card/number generation collaborator. Invoked once per
/// event, while the event is still in draft; the engine only ever reads the
/// persisted output afterwards.
#[derive(Clone)]
pub struct GeneratorClient {
    client: reqwest::Client,
    config: GeneratorConfig,
}

#[derive(Debug, Serialize)]
pub struct GenerateTicketsRequest {
    pub event_id: Uuid,
    /// Server-only seed; the generator derives every grid from it.
    pub seed: String,
    pub total_cards: i32,
    pub rounds: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSubcard {
    pub round: i16,
    pub hash: String,
    /// 5x5, row-major; values are "1".."75" or "FREE" at the center.
    pub grid: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedCard {
    pub card_id: Uuid,
    pub card_index: i32,
    pub qr_code: String,
    pub subcards: Vec<GeneratedSubcard>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTicketsResponse {
    pub status: String,
    pub generated: usize,
    pub cards: Vec<GeneratedCard>,
}

impl GeneratorClient {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn generate_tickets(
        &self,
        request: &GenerateTicketsRequest,
    ) -> AppResult<GenerateTicketsResponse> {
        let url = format!("{}/generator/generate", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("X-API-Key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApiError(format!(
                "Generator returned {status}: {body}"
            )));
        }

        let parsed: GenerateTicketsResponse = response.json().await?;

        if parsed.status != "ok" {
            return Err(AppError::ExternalApiError(format!(
                "Generator reported status '{}'",
                parsed.status
            )));
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_payload_shape() {
        let request = GenerateTicketsRequest {
            event_id: Uuid::nil(),
            seed: "abc".into(),
            total_cards: 100,
            rounds: 5,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["total_cards"], 100);
        assert_eq!(json["rounds"], 5);
        assert_eq!(json["seed"], "abc");
    }

    #[test]
    fn test_generated_card_parses() {
        let raw = serde_json::json!({
            "card_id": "550e8400-e29b-41d4-a716-446655440000",
            "card_index": 1,
            "qr_code": "QR123",
            "subcards": [{
                "round": 1,
                "hash": "deadbeef",
                "grid": [
                    ["1", "16", "31", "46", "61"],
                    ["2", "17", "32", "47", "62"],
                    ["3", "18", "FREE", "48", "63"],
                    ["4", "19", "33", "49", "64"],
                    ["5", "20", "34", "50", "65"]
                ]
            }]
        });
        let card: GeneratedCard = serde_json::from_value(raw).unwrap();
        assert_eq!(card.card_index, 1);
        assert_eq!(card.subcards.len(), 1);
        assert_eq!(card.subcards[0].grid[2][2], "FREE");
    }
}
