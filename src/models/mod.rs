pub mod access_token;
pub mod id_param;
pub mod pagination;
pub mod task;
pub mod user;

pub use access_token::{AccessToken, NewAccessToken};
pub use id_param::IdParam;
pub use pagination::{Page, PageMeta, PageRequest, PaginationQuery};
pub use task::{CreateTaskRequest, NewTask, Task, TaskChanges, UpdateTaskRequest};
pub use user::{CreateUserRequest, NewUser, UpdateUserRequest, User, UserChanges, UserWithTasks};

/// A stored entity addressed by a numeric id.
///
/// `Create` is the fully-resolved input for an insert, `Changes` a partial update
/// where `None` leaves a column untouched.
pub trait Entity: Send + Sync + 'static {
    type Create: Send + 'static;
    type Changes: Send + 'static;

    /// Human readable name used in error messages.
    const NAME: &'static str;
}

impl Entity for User {
    type Create = NewUser;
    type Changes = UserChanges;
    const NAME: &'static str = "User";
}

impl Entity for Task {
    type Create = NewTask;
    type Changes = TaskChanges;
    const NAME: &'static str = "Task";
}

/// Trims an optional string in place.
pub(crate) fn trim_opt(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}
