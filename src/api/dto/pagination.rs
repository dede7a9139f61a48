//! Pagination query parameters and paged responses.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::config::MAX_PAGE_SIZE;
use crate::error::AppError;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Validated page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl PaginationParams {
    /// Validates the parameters against the configured default page size.
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and [`MAX_PAGE_SIZE`]
    pub fn resolve(&self, default_page_size: u32) -> Result<PageRequest, AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(default_page_size);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "page_size": page_size }),
            ));
        }

        Ok(PageRequest { page, page_size })
    }
}

/// One page of a list endpoint.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let request = params(None, None).resolve(25).unwrap();
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), 25);
    }

    #[test]
    fn test_page_2_with_default_size() {
        let request = params(Some(2), None).resolve(25).unwrap();
        assert_eq!(request.offset(), 25);
        assert_eq!(request.limit(), 25);
    }

    #[test]
    fn test_custom_page_and_size() {
        let request = params(Some(3), Some(50)).resolve(25).unwrap();
        assert_eq!(request.offset(), 100);
        assert_eq!(request.limit(), 50);
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(Some(0), None).resolve(25).is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(0)).resolve(25).is_err());
        assert!(params(None, Some(1)).resolve(25).is_ok());
        assert!(params(None, Some(MAX_PAGE_SIZE)).resolve(25).is_ok());
        assert!(params(None, Some(MAX_PAGE_SIZE + 1)).resolve(25).is_err());
    }

    #[test]
    fn test_query_string_numbers_parse() {
        let p: PaginationParams = serde_json::from_str(r#"{"page": "2", "page_size": "10"}"#).unwrap();
        assert_eq!(p.page, Some(2));
        assert_eq!(p.page_size, Some(10));
    }
}
