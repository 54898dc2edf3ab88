use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskRequest, Entity, IdParam, NewTask, Task, UpdateTaskRequest},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

fn task_not_found() -> AppError {
    AppError::NotFound(format!("{} not found", Task::NAME))
}

/// Loads a task by path id, treating other users' tasks as absent.
async fn owned_task(state: &AppState, path: &IdParam, current: &AuthenticatedUser) -> Result<Task, AppError> {
    let id = path.parse()?;
    state
        .tasks
        .find_owned(id, current.id())
        .await?
        .ok_or_else(task_not_found)
}

/// Retrieves the authenticated user's tasks, ordered by id.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    current: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.for_user(current.id()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: 3 to 255 characters (required).
/// - `description` (optional): at most 1000 characters.
///
/// New tasks always start with `done = false`.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` object as JSON.
/// - `400 Bad Request`: If the body is malformed or fails validation.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<CreateTaskRequest>,
    current: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let input = task_data.into_inner().normalized();
    input.validate()?;

    let task = state
        .tasks
        .create(NewTask::from_request(input, current.id()))
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: Returns the `Task` object as JSON.
/// - `400 Bad Request`: If the id is not a number.
/// - `404 Not Found`: If the task does not exist or belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    path: web::Path<IdParam>,
    current: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = owned_task(&state, &path, &current).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates one of the authenticated user's tasks.
///
/// ## Request Body:
/// Any of `title`, `description`, `done`.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task` object as JSON.
/// - `400 Bad Request`: If the id or body is invalid.
/// - `404 Not Found`: If the task does not exist or belongs to someone else.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<IdParam>,
    task_data: web::Json<UpdateTaskRequest>,
    current: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = owned_task(&state, &path, &current).await?;

    let input = task_data.into_inner().normalized();
    input.validate()?;

    let updated = state
        .tasks
        .update(task.id, input.into_changes())
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes one of the authenticated user's tasks.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `400 Bad Request`: If the id is not a number.
/// - `404 Not Found`: If the task does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    path: web::Path<IdParam>,
    current: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = owned_task(&state, &path, &current).await?;

    if !state.tasks.delete(task.id).await? {
        return Err(task_not_found());
    }

    Ok(HttpResponse::NoContent().finish())
}
