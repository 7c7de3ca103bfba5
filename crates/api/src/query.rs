//! Shared query parameter types for API handlers.

use rallypoint_core::validation::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` ready to bind into a query.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            clamp_offset(self.offset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(PaginationParams::default().resolve(), (DEFAULT_PAGE_SIZE, 0));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-1),
        };
        assert_eq!(params.resolve(), (MAX_PAGE_SIZE, 0));
    }
}
