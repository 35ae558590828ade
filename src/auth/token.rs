use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Identity asserted by an issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub email: String,
}

/// Registered JWT claims as they appear on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError>;
}

/// HS256 issuer with a shared secret.
pub struct JwtIssuer {
    secret: Option<String>,
    expiry: Duration,
}

impl JwtIssuer {
    pub fn new(secret: Option<String>, expiry_hours: i64) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    fn secret(&self) -> Result<&[u8], TokenError> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or(TokenError::MissingSecret)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret()?),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| TokenError::Invalid(e.to_string()))?;

        Ok(data.claims)
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let secret = self.secret()?;
        let now = Utc::now();
        let claims = Claims {
            sub: claims.subject.clone(),
            email: claims.email.clone(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}
