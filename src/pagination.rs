/**
 * Pagination Parameters
 *
 * Shared query parameters for every paginated list endpoint
 * (`?page=0&per_page=20`).
 */
use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    /// Zero-based page index
    #[serde(default)]
    pub page: u32,
    /// Page size, clamped to [1, 100]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl PageParams {
    /// Page size bounded to the allowed range
    pub fn per_page_clamped(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_per_page_clamped() {
        let params: PageParams = serde_json::from_str(r#"{"per_page": 0}"#).unwrap();
        assert_eq!(params.per_page_clamped(), 1);

        let params: PageParams = serde_json::from_str(r#"{"per_page": 500}"#).unwrap();
        assert_eq!(params.per_page_clamped(), MAX_PER_PAGE);
    }
}
