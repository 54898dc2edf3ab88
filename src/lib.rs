#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Domain models, storage backends, bearer-token sessions, routing and error"]
#![doc = "handling for the task tracking API. The binary (`main.rs`) reads the"]
#![doc = "configuration, picks a storage backend and serves `routes::config` under `/api`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

pub use crate::error::AppError;
pub use crate::state::AppState;
