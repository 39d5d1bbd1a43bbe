//! Page DTOs - limit/offset pagination over employees

use super::EmployeeDTO;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string of `GET /api/v1/employees/page`.
///
/// `page_size` has no default: leaving it out fails validation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PageRequest {
    #[serde(default)]
    #[validate(range(min = 0, message = "page_number must not be negative"))]
    pub page_number: i64,

    #[serde(default)]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: i64,

    #[serde(default)]
    pub text_filter: Option<String>,
}

impl PageRequest {
    /// Zero-based row offset of the first item of the page
    pub fn offset(&self) -> i64 {
        self.page_number.saturating_mul(self.page_size)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResponse {
    pub result: Vec<EmployeeDTO>,
    pub page_size: i64,
    pub page_num: i64,
    /// Rows matching the filter across all pages
    pub total: i64,
    pub text_filter: Option<String>,
}
