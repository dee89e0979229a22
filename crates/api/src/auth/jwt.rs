//! Bearer tokens.
//!
//! Stateless HS256 JWTs. A token names the user it was issued to and stays
//! valid for `JWT_EXPIRY_DAYS`; there is no refresh or revocation.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use gameplan_core::types::DbId;

const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Payload of every GamePlan token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's id.
    pub sub: DbId,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Issued at, Unix seconds.
    pub iat: i64,
    /// Random token id, only for log correlation.
    pub jti: String,
}

impl Claims {
    fn for_user(user_id: DbId, lifetime: Duration) -> Self {
        let issued = Utc::now();
        Self {
            sub: user_id,
            exp: (issued + lifetime).timestamp(),
            iat: issued.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared by signing and verification.
    pub secret: String,
    pub token_expiry_days: i64,
}

impl JwtConfig {
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_EXPIRY_DAYS` | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the expiry is not a
    /// number.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_days = match std::env::var("JWT_EXPIRY_DAYS") {
            Ok(days) => days.parse().expect("JWT_EXPIRY_DAYS must be a whole number of days"),
            Err(_) => DEFAULT_EXPIRY_DAYS,
        };

        Self {
            secret,
            token_expiry_days,
        }
    }

    fn lifetime(&self) -> Duration {
        Duration::days(self.token_expiry_days)
    }
}

/// Sign a token for `user_id`.
pub fn generate_token(user_id: DbId, config: &JwtConfig) -> Result<String, JwtError> {
    let claims = Claims::for_user(user_id, config.lifetime());
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry and return the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
