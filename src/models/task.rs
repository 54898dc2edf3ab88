use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::trim_opt;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i64,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Whether the task is finished. New tasks start as `false`.
    pub done: bool,
    /// Identifier of the user who owns the task.
    pub user_id: i64,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// The title of the task.
    /// Must be between 3 and 255 characters.
    #[validate(length(min = 3, max = 255))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl CreateTaskRequest {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: trim_opt(self.description),
        }
    }
}

/// Input structure for a partial task update.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 3, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub done: Option<bool>,
}

impl UpdateTaskRequest {
    pub fn normalized(self) -> Self {
        Self {
            title: trim_opt(self.title),
            description: trim_opt(self.description),
            done: self.done,
        }
    }

    pub fn into_changes(self) -> TaskChanges {
        TaskChanges {
            title: self.title,
            description: self.description,
            done: self.done,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub user_id: i64,
}

impl NewTask {
    pub fn from_request(input: CreateTaskRequest, user_id: i64) -> Self {
        Self {
            title: input.title,
            description: input.description,
            user_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}
