use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

/// A stored access token. The bearer credential handed to clients carries this
/// row's `id` as its `jti`; deleting the row revokes the credential.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Returns true if `expires_at` is set and lies before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }
}

#[derive(Debug, Clone)]
pub struct NewAccessToken {
    pub id: Uuid,
    pub user_id: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewAccessToken {
    /// A fresh token for `user_id`, expiring `ttl` from now when given.
    pub fn issue(user_id: i64, ttl: Option<chrono::Duration>) -> Result<Self, AppError> {
        let expires_at = match ttl {
            Some(ttl) => Some(Utc::now().checked_add_signed(ttl).ok_or_else(|| {
                AppError::InternalServerError(format!("token lifetime {} overflows", ttl))
            })?),
            None => None,
        };
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            expires_at,
        })
    }
}
