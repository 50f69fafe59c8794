use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;

/// Signs a bearer token for the given subject and role. Teachers get
/// month-long sessions so a signup flows straight into a logged-in state;
/// dashboard sessions are shorter-lived.
pub fn issue_token(subject: Uuid, role: &str, ttl_hours: i64) -> Result<String> {
    let config = crate::config::get_config();
    let exp = (Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = Claims {
        sub: subject.to_string(),
        exp,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("failed to sign token: {}", e)))
}

/// Resolves the authenticated subject id out of decoded claims.
pub fn subject_id(claims: &Claims) -> Result<Uuid> {
    Uuid::parse_str(&claims.sub)
        .map_err(|_| Error::Unauthorized("malformed token subject".to_string()))
}
