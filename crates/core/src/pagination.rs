//! Page/limit clamping shared by every listing endpoint.

use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Query-string pagination parameters. Values are clamped rather than
/// rejected: page floors at 1, limit at 1..=100.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: None, limit: None }
    }
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    pub fn has_more(&self, returned: usize, total: i64) -> bool {
        self.offset() + (returned as i64) < total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, limit: i64) -> PageParams {
        PageParams { page: Some(page), limit: Some(limit) }
    }

    #[test]
    fn defaults_apply_when_absent() {
        let p = PageParams::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(params(0, 0).page(), 1);
        assert_eq!(params(-3, -3).limit(), 1);
        assert_eq!(params(1, 10_000).limit(), MAX_LIMIT);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        assert_eq!(params(3, 25).offset(), 50);
    }

    #[test]
    fn has_more_reflects_remaining_rows() {
        let p = params(1, 10);
        assert!(p.has_more(10, 25));
        assert!(!p.has_more(10, 10));
        let last = params(3, 10);
        assert!(!last.has_more(5, 25));
    }
}
