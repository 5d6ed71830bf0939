use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access-token claims issued by the identity platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Platform tokens carry an `aud` we do not pin.
    validation.validate_aud = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .context("invalid or expired token")?;
    Ok(data.claims)
}

pub fn issue_token(secret: &str, user_id: &str, email: Option<&str>, ttl_secs: i64) -> Result<String> {
    let exp = (chrono::Utc::now().timestamp() + ttl_secs).max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.map(str::to_string),
        exp,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
