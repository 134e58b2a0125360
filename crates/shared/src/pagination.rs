//! Limit/offset pagination helpers for admin listings.

use serde::Deserialize;

/// Default page size when the caller does not specify one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size a caller may request.
pub const MAX_LIMIT: i64 = 200;

/// Query parameters for paginated listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    /// Effective limit, clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_clamped() {
        let params = PageParams {
            limit: Some(10_000),
            offset: None,
        };
        assert_eq!(params.limit(), MAX_LIMIT);

        let params = PageParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.limit(), 1);

        let params = PageParams {
            limit: Some(-5),
            offset: None,
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_offset_never_negative() {
        let params = PageParams {
            limit: None,
            offset: Some(-20),
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_deserialization_from_query() {
        let params: PageParams = serde_json::from_str(r#"{"limit": 25, "offset": 50}"#).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 50);
    }
}
