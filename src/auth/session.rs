//! Login, logout and per-request token resolution.
//!
//! A session is an `access_tokens` row plus the signed credential that names it.
//! Signature and expiry are checked on the credential; existence and ownership
//! on the row, which is what makes logout immediate.

use chrono::Utc;

use super::extractors::AuthenticatedUser;
use super::{generate_token, verify_password, verify_token, Claims, LoginRequest, SessionResponse, TOKEN_TYPE};
use crate::error::AppError;
use crate::models::NewAccessToken;
use crate::state::AppState;

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

/// Verifies `credentials` and issues a new access token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(state: &AppState, credentials: &LoginRequest) -> Result<SessionResponse, AppError> {
    let user = match state.users.find_by_email(credentials.email.trim()).await? {
        Some(user) => user,
        None => {
            log::warn!("Login failed: no account for {}", credentials.email);
            return Err(invalid_credentials());
        }
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        log::warn!("Login failed: wrong password for user {}", user.id);
        return Err(invalid_credentials());
    }

    let row = state
        .tokens
        .create(NewAccessToken::issue(user.id, state.auth.token_ttl)?)
        .await?;
    let token = generate_token(&Claims::for_token(&row), &state.auth.jwt_secret)?;

    log::info!("User {} logged in (token {})", user.id, row.id);
    Ok(SessionResponse {
        token_type: TOKEN_TYPE.to_string(),
        token,
        expires_at: row.expires_at,
        user,
    })
}

/// Resolves a bearer credential to the user it was issued to.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedUser, AppError> {
    let claims = verify_token(token, &state.auth.jwt_secret)?;

    let row = state
        .tokens
        .find(claims.jti)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Token has been revoked".into()))?;
    if row.user_id != claims.sub {
        return Err(AppError::Unauthorized("Token does not match its owner".into()));
    }
    if row.is_expired_at(Utc::now()) {
        return Err(AppError::Unauthorized("Token has expired".into()));
    }

    let user = state
        .users
        .find(row.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Token owner no longer exists".into()))?;
    state.tokens.touch(row.id).await?;

    Ok(AuthenticatedUser {
        user,
        token_id: row.id,
    })
}

/// Revokes the token the current request was authenticated with.
pub async fn logout(state: &AppState, current: &AuthenticatedUser) -> Result<(), AppError> {
    if !state.tokens.delete(current.user.id, current.token_id).await? {
        return Err(AppError::BadRequest("Access token not found".into()));
    }
    log::info!("User {} logged out (token {})", current.user.id, current.token_id);
    Ok(())
}
