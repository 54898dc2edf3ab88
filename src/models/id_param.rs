use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

lazy_static! {
    // Path ids are plain unsigned decimal numbers.
    static ref ID_PARAM_REGEX: Regex = Regex::new(r"^\d+$").unwrap();
}

/// The `{id}` segment of `/users/{id}` and `/tasks/{id}`, kept as a string so
/// malformed ids surface as validation errors rather than routing failures.
#[derive(Debug, Deserialize, Validate)]
pub struct IdParam {
    #[validate(regex(path = "ID_PARAM_REGEX", message = "id must contain digits only"))]
    pub id: String,
}

impl IdParam {
    /// Validates the segment and converts it to a row id.
    pub fn parse(&self) -> Result<i64, AppError> {
        self.validate()?;
        self.id
            .parse::<i64>()
            .map_err(|_| AppError::invalid_field("id", "range", "id is out of range"))
    }
}
