use crate::domain::errors::ServiceError;
use serde::Serialize;

/// Zero-based page request. `offset` is the page number, `count` the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: i64,
    pub count: i64,
}

impl PageRequest {
    pub fn new(offset: i64, count: i64, max_count: i64) -> Result<Self, ServiceError> {
        if offset < 0 {
            return Err(ServiceError::invalid("offset", "page offset must be 0 or greater"));
        }
        if count < 1 || count > max_count {
            return Err(ServiceError::invalid(
                "count",
                format!("page size must be between 1 and {}", max_count),
            ));
        }
        Ok(Self { offset, count })
    }

    /// Number of rows to skip in SQL.
    pub fn skip(&self) -> i64 {
        self.offset.saturating_mul(self.count)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedList<T> {
    pub total: i64,
    pub count: i64,
    pub offset: i64,
    pub list: Vec<T>,
}

impl<T> PagedList<T> {
    pub fn new(page: PageRequest, total: i64, list: Vec<T>) -> Self {
        Self {
            total,
            count: list.len() as i64,
            offset: page.offset,
            list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_is_page_times_size() {
        let page = PageRequest::new(2, 10, 100).unwrap();
        assert_eq!(page.skip(), 20);
    }

    #[test]
    fn test_rejects_bad_bounds() {
        assert!(PageRequest::new(-1, 10, 100).is_err());
        assert!(PageRequest::new(0, 0, 100).is_err());
        assert!(PageRequest::new(0, 101, 100).is_err());
    }

    #[test]
    fn test_paged_list_counts_page_items() {
        let page = PageRequest::new(1, 2, 100).unwrap();
        let list = PagedList::new(page, 5, vec!["c", "d"]);
        assert_eq!(list.total, 5);
        assert_eq!(list.count, 2);
        assert_eq!(list.offset, 1);
    }
}
