use crate::{
    auth::hash_password,
    error::AppError,
    models::{
        CreateUserRequest, Entity, IdParam, NewUser, Page, PaginationQuery, UpdateUserRequest,
        User, UserChanges, UserWithTasks,
    },
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

fn user_not_found() -> AppError {
    AppError::NotFound(format!("{} not found", User::NAME))
}

/// Lists users, one page at a time, each with their tasks attached.
///
/// ## Query Parameters:
/// - `page` (optional, default 1): positive integer.
/// - `perPage` (optional, default 10): positive integer, at most 100.
///
/// ## Responses:
/// - `200 OK`: `{ meta: {...}, data: [user with tasks] }`.
/// - `400 Bad Request`: invalid pagination parameters.
#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;

    let Page { meta, data } = state.users.paginate(query.page_request()).await?;
    let ids: Vec<i64> = data.iter().map(|u| u.id).collect();
    let tasks = state.tasks.for_users(&ids).await?;

    Ok(HttpResponse::Ok().json(Page {
        meta,
        data: UserWithTasks::attach(data, tasks),
    }))
}

/// Registers a new user.
///
/// ## Responses:
/// - `201 Created`: the new user (without password).
/// - `400 Bad Request`: validation failure, or the email is already registered.
#[post("")]
pub async fn create_user(
    state: web::Data<AppState>,
    user_data: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    let input = user_data.into_inner().normalized();
    input.validate()?;

    let password_hash = hash_password(&input.password, state.auth.bcrypt_cost)?;
    let user = state
        .users
        .create(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
        })
        .await?;

    log::info!("Registered user {}", user.id);
    Ok(HttpResponse::Created().json(user))
}

/// Fetches one user with their tasks.
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<IdParam>,
) -> Result<impl Responder, AppError> {
    let id = path.parse()?;

    let user = state.users.find(id).await?.ok_or_else(user_not_found)?;
    let tasks = state.tasks.for_user(id).await?;

    Ok(HttpResponse::Ok().json(UserWithTasks { user, tasks }))
}

/// Updates any of `name`, `email`, `password`.
///
/// ## Responses:
/// - `200 OK`: the updated user.
/// - `400 Bad Request`: invalid id or payload, or the new email belongs to another user.
/// - `404 Not Found`: no such user.
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<IdParam>,
    user_data: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let id = path.parse()?;
    let current = state.users.find(id).await?.ok_or_else(user_not_found)?;

    let input = user_data.into_inner().normalized();
    input.validate()?;

    if let Some(email) = input.email.as_deref() {
        if email != current.email && state.users.email_taken(email, id).await? {
            return Err(AppError::BadRequest(
                "Email already in use by another user".into(),
            ));
        }
    }

    let password_hash = match input.password.as_deref() {
        Some(password) => Some(hash_password(password, state.auth.bcrypt_cost)?),
        None => None,
    };
    let changes = UserChanges {
        name: input.name,
        email: input.email,
        password_hash,
    };

    let user = state
        .users
        .update(id, changes)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(HttpResponse::Ok().json(user))
}

/// Deletes a user; their tasks and access tokens go with them.
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<IdParam>,
) -> Result<impl Responder, AppError> {
    let id = path.parse()?;

    if !state.users.delete(id).await? {
        return Err(user_not_found());
    }

    log::info!("Deleted user {}", id);
    Ok(HttpResponse::NoContent().finish())
}
