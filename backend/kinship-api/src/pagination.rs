/// Page-number pagination shared by every list endpoint
///
/// Requests carry `?page=<n>&limit=<m>`; responses are wrapped in
/// `{count, page, limit, next, previous, results}`.
use crate::config::PaginationConfig;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageQuery {
    pub fn resolve(&self, config: &PaginationConfig) -> Result<PageRequest> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::BadRequest("Invalid page.".to_string()));
        }

        let max = i64::from(config.max_limit.max(1));
        let limit = self
            .limit
            .unwrap_or_else(|| i64::from(config.default_limit))
            .clamp(1, max);

        Ok(PageRequest { page, limit })
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub page: i64,
    pub limit: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, req: PageRequest) -> Self {
        let next = if req.page.saturating_mul(req.limit) < count {
            Some(req.page + 1)
        } else {
            None
        };
        let previous = (req.page > 1).then(|| req.page - 1);

        Self {
            count,
            page: req.page,
            limit: req.limit,
            next,
            previous,
            results,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            limit: self.limit,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
