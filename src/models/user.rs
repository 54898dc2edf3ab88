use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{trim_opt, Task};

/// A registered user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with the tasks they own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithTasks {
    #[serde(flatten)]
    pub user: User,
    pub tasks: Vec<Task>,
}

impl UserWithTasks {
    /// Groups `tasks` under their owners, preserving the order of `users`.
    pub fn attach(users: Vec<User>, tasks: Vec<Task>) -> Vec<UserWithTasks> {
        let mut by_owner: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in tasks {
            by_owner.entry(task.user_id).or_default().push(task);
        }
        users
            .into_iter()
            .map(|user| {
                let tasks = by_owner.remove(&user.id).unwrap_or_default();
                UserWithTasks { user, tasks }
            })
            .collect()
    }
}

/// Payload for `POST /api/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name, 3 to 255 characters after trimming.
    #[validate(length(min = 3, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Plain-text password, hashed before it is stored.
    #[validate(length(min = 6, max = 255))]
    pub password: String,
}

impl CreateUserRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

/// Payload for `PUT /api/users/{id}`; every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 255))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: trim_opt(self.name),
            email: trim_opt(self.email),
            password: self.password,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
