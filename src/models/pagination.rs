use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

/// `?page=&perPage=` query parameters. Both are optional positive integers;
/// `perPage` above 100 fails validation.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PaginationQuery {
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: Option<i64>,
    #[serde(rename = "perPage")]
    #[validate(range(min = 1, max = 100, message = "perPage must be between 1 and 100"))]
    pub per_page: Option<i64>,
}

impl PaginationQuery {
    /// Resolves defaults. Call after `validate()`.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
    pub first_page: i64,
}

/// One page of results plus the numbers needed to walk the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        let last_page = if total <= 0 {
            1
        } else {
            (total + request.per_page - 1) / request.per_page
        };
        Self {
            meta: PageMeta {
                total,
                per_page: request.per_page,
                current_page: request.page,
                last_page,
                first_page: 1,
            },
            data,
        }
    }
}
