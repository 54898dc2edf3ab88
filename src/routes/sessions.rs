use crate::{
    auth::{session, AuthMiddleware, AuthenticatedUser, LoginRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{delete, post, web, HttpResponse, Responder};
use validator::Validate;

/// Log in
///
/// Verifies email and password and returns `{type, token, expiresAt, user}`.
///
/// ## Responses:
/// - `200 OK`: credentials accepted, token issued.
/// - `400 Bad Request`: payload missing or failing validation.
/// - `401 Unauthorized`: unknown email or wrong password.
#[post("/sessions")]
pub async fn create_session(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let response = session::login(&state, &login_data).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Log out
///
/// Revokes the access token presented with this request.
///
/// ## Responses:
/// - `204 No Content`: token revoked.
/// - `400 Bad Request`: the token row was already gone.
/// - `401 Unauthorized`: no valid token presented.
#[delete("/sessions", wrap = "AuthMiddleware")]
pub async fn destroy_session(
    state: web::Data<AppState>,
    current: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    session::logout(&state, &current).await?;
    Ok(HttpResponse::NoContent().finish())
}
