pub mod extractors;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

pub const TOKEN_TYPE: &str = "bearer";

/// Secrets and knobs for issuing credentials.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HMAC secret used to sign access tokens.
    pub jwt_secret: String,
    /// Access-token lifetime. `None` issues tokens without expiry.
    pub token_ttl: Option<chrono::Duration>,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
}

/// Represents the payload for a login request (`POST /api/sessions`).
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response after a successful login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Always `"bearer"`.
    #[serde(rename = "type")]
    pub token_type: String,
    /// The credential to send as `Authorization: Bearer <token>`.
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}
