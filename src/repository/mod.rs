//! Data access.
//!
//! `Repository<E>` is the CRUD surface shared by every entity; the per-entity
//! traits add the handful of queries that only make sense for one type. Handlers
//! only ever see these traits, through the `Arc<dyn ...>` handles in
//! [`AppState`](crate::state::AppState).
//!
//! Two backends implement all of them:
//! - [`PgStore`]: PostgreSQL through `sqlx`;
//! - [`MemoryStore`]: process-local tables, used when no database is configured
//!   and by the test suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    AccessToken, Entity, NewAccessToken, Page, PageRequest, Task, User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<E>, AppError>;

    async fn create(&self, input: E::Create) -> Result<E, AppError>;

    /// Applies `changes` and bumps `updated_at`. `None` when the row is absent.
    async fn update(&self, id: i64, changes: E::Changes) -> Result<Option<E>, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Users ordered by id.
    async fn paginate(&self, request: PageRequest) -> Result<Page<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Whether a user other than `except_id` already holds `email`.
    async fn email_taken(&self, email: &str, except_id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskRepository: Repository<Task> {
    /// Tasks owned by `user_id`, ordered by id.
    async fn for_user(&self, user_id: i64) -> Result<Vec<Task>, AppError>;

    /// Tasks owned by any of `user_ids`, ordered by id.
    async fn for_users(&self, user_ids: &[i64]) -> Result<Vec<Task>, AppError>;

    /// The task with `id`, only if it belongs to `user_id`.
    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Task>, AppError>;
}

#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    async fn create(&self, token: NewAccessToken) -> Result<AccessToken, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<AccessToken>, AppError>;

    /// Records that the token was just used.
    async fn touch(&self, id: Uuid) -> Result<(), AppError>;

    /// Deletes the token if it belongs to `user_id`; returns whether it did.
    async fn delete(&self, user_id: i64, id: Uuid) -> Result<bool, AppError>;
}
