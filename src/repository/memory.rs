use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccessTokenRepository, Repository, TaskRepository, UserRepository};
use crate::error::AppError;
use crate::models::{
    AccessToken, NewAccessToken, NewTask, NewUser, Page, PageRequest, Task, TaskChanges, User,
    UserChanges,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    tokens: HashMap<Uuid, AccessToken>,
    last_user_id: i64,
    last_task_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except_id)
    }
}

/// In-memory store with the same constraints as the SQL schema: unique emails,
/// tasks must reference an existing user, and deleting a user cascades to
/// their tasks and access tokens.
///
/// Ids are assigned sequentially and never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_in_use() -> AppError {
    AppError::BadRequest("Email already in use".into())
}

#[async_trait]
impl Repository<User> for MemoryStore {
    async fn find(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, input: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&input.email, None) {
            return Err(email_in_use());
        }
        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(email_in_use());
            }
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, task| task.user_id != id);
        tables.tokens.retain(|_, token| token.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn paginate(&self, request: PageRequest) -> Result<Page<User>, AppError> {
        let tables = self.tables.read().await;
        let total = tables.users.len() as i64;
        let data = tables
            .users
            .values()
            .skip(request.offset().max(0) as usize)
            .take(request.per_page.max(0) as usize)
            .cloned()
            .collect();
        Ok(Page::new(data, total, request))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn email_taken(&self, email: &str, except_id: i64) -> Result<bool, AppError> {
        Ok(self.tables.read().await.email_taken(email, Some(except_id)))
    }
}

#[async_trait]
impl Repository<Task> for MemoryStore {
    async fn find(&self, id: i64) -> Result<Option<Task>, AppError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn create(&self, input: NewTask) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.user_id) {
            return Err(AppError::DatabaseError(format!(
                "task references missing user {}",
                input.user_id
            )));
        }
        tables.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: tables.last_task_id,
            title: input.title,
            description: input.description,
            done: false,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        if let Some(done) = changes.done {
            task.done = done;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn for_user(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        self.for_users(&[user_id]).await
    }

    async fn for_users(&self, user_ids: &[i64]) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| user_ids.contains(&t.user_id))
            .cloned()
            .collect())
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl AccessTokenRepository for MemoryStore {
    async fn create(&self, token: NewAccessToken) -> Result<AccessToken, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&token.user_id) {
            return Err(AppError::DatabaseError(format!(
                "access token references missing user {}",
                token.user_id
            )));
        }
        let token = AccessToken {
            id: token.id,
            user_id: token.user_id,
            created_at: Utc::now(),
            last_used_at: None,
            expires_at: token.expires_at,
        };
        tables.tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find(&self, id: Uuid) -> Result<Option<AccessToken>, AppError> {
        Ok(self.tables.read().await.tokens.get(&id).cloned())
    }

    async fn touch(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(token) = self.tables.write().await.tokens.get_mut(&id) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete(&self, user_id: i64, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = matches!(tables.tokens.get(&id), Some(token) if token.user_id == user_id);
        if owned {
            tables.tokens.remove(&id);
        }
        Ok(owned)
    }
}
