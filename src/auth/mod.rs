use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session token claims. `sub` is the user id issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
    InvalidToken(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verifies HS256 session tokens against the configured secret
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    configured: bool,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            configured: !secret.is_empty(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        if !self.configured {
            return Err(JwtError::InvalidSecret);
        }
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_with_the_same_secret() {
        let token = generate_jwt("s3cret", &Claims::new("user_1", 1)).unwrap();
        let claims = SessionVerifier::new("s3cret").verify(&token).unwrap();
        assert_eq!(claims.sub, "user_1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_or_expired_token_is_rejected() {
        let token = generate_jwt("s3cret", &Claims::new("user_1", 1)).unwrap();
        assert!(SessionVerifier::new("other").verify(&token).is_err());

        let mut stale = Claims::new("user_1", 1);
        stale.iat -= 7200;
        stale.exp = stale.iat + 60;
        let token = generate_jwt("s3cret", &stale).unwrap();
        assert!(SessionVerifier::new("s3cret").verify(&token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            generate_jwt("", &Claims::new("u", 1)),
            Err(JwtError::InvalidSecret)
        ));
        assert!(matches!(
            SessionVerifier::new("").verify("abc"),
            Err(JwtError::InvalidSecret)
        ));
    }
}
