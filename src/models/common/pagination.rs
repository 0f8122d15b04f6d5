use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

/// 规范化页码与页大小：page >= 1，size ∈ [1, 100]
pub fn page_window(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or_else(default_page).max(1) as u64;
    let size = size.unwrap_or_else(default_size).clamp(1, 100) as u64;
    (page, size)
}

impl PaginationInfo {
    pub fn new(page: u64, size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(None, None), (1, 10));
        assert_eq!(page_window(Some(2), Some(0)), (2, 1));
    }

    #[test]
    fn test_page_window_is_clamped() {
        assert_eq!(page_window(Some(-4), Some(1000)), (1, 100));
    }
}
