use crate::{config::Config, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's email address.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and validates HS256 bearer tokens with a secret taken from [`Config`].
///
/// Built once at startup and shared through `web::Data`; it holds no mutable state.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        // Expiry is exact: no clock-skew allowance past `exp`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, Duration::minutes(config.token_ttl_minutes))
    }

    /// Issues a token for `subject` using the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::InternalServerError("Token lifetime overflows".into()))?;

        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.timestamp().max(0) as usize,
            exp: expiration.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry.
    ///
    /// Every failure yields the same `AppError::Unauthorized`; the cause is only logged.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UNAUTHENTICATED_MESSAGE;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::minutes(30))
    }

    fn assert_generic_unauthorized(result: Result<Claims, AppError>) {
        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, UNAUTHENTICATED_MESSAGE),
            other => panic!("Expected generic unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = service("test_secret_for_gen_verify");
        let token = tokens.issue("a@x.com").unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_default_lifetime_is_applied() {
        let tokens = service("ttl_secret");
        let claims = tokens.validate(&tokens.issue("a@x.com").unwrap()).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_token_expiration() {
        let tokens = service("test_secret_for_expiration");
        let expired = tokens
            .issue_with_ttl("a@x.com", Duration::hours(-2))
            .unwrap();

        assert_generic_unauthorized(tokens.validate(&expired));
    }

    #[test]
    fn test_recently_expired_token_is_rejected() {
        let tokens = service("test_secret_for_recent_expiry");
        let expired = tokens
            .issue_with_ttl("a@x.com", Duration::seconds(-30))
            .unwrap();

        assert_generic_unauthorized(tokens.validate(&expired));
    }

    #[test]
    fn test_invalid_token_signature() {
        let issuer = service("secret_one");
        let verifier = service("a_completely_different_secret");
        let token = issuer.issue("a@x.com").unwrap();

        assert_generic_unauthorized(verifier.validate(&token));
    }

    #[test]
    fn test_malformed_token() {
        assert_generic_unauthorized(service("secret").validate("not.a.jwt"));
        assert_generic_unauthorized(service("secret").validate(""));
    }
}
