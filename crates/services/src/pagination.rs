use lexcase_db::{clamp_limit, clamp_offset};
use serde::{Deserialize, Serialize};

/// Pagination parameters accepted by list operations.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    /// Resolve into concrete `(limit, offset)` values, clamped to the
    /// page-size bounds.
    pub fn resolve(self) -> (i64, i64) {
        (clamp_limit(self.limit), clamp_offset(self.offset))
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
    pub data: Vec<T>,
}
