use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Coarse role issued by the identity provider. Organizers run events and
/// draws; participants can claim bingo and read state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Organizer,
    Participant,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id (uuid)
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Identity extracted from a verified token, injected into request
/// extensions by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_organizer(&self) -> bool {
        matches!(self.role, UserRole::Organizer)
    }
}

/// Verifies bearer tokens issued by the external identity provider. Token
/// issuance lives there; this service only validates and decodes.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a token with the shared secret. Used by tests and local tooling;
    /// production tokens come from the identity provider.
    pub fn generate_token(&self, user_id: Uuid, role: UserRole) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(12);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)?;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthError("Malformed subject claim".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_roundtrip() {
        let service = JwtService::new("test-secret");
        let user_id = Uuid::new_v4();
        let token = service.generate_token(user_id, UserRole::Organizer).unwrap();

        let user = service.verify_token(&token).unwrap();
        assert_eq!(user.id, user_id);
        assert!(user.is_organizer());
    }

    #[test]
    fn test_participant_role_is_not_organizer() {
        let service = JwtService::new("test-secret");
        let token = service
            .generate_token(Uuid::new_v4(), UserRole::Participant)
            .unwrap();
        let user = service.verify_token(&token).unwrap();
        assert!(!user.is_organizer());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtService::new("secret-a");
        let verifier = JwtService::new("secret-b");
        let token = issuer
            .generate_token(Uuid::new_v4(), UserRole::Participant)
            .unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = JwtService::new("test-secret");
        assert!(service.verify_token("not-a-token").is_err());
    }
}
