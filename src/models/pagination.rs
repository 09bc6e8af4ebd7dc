//! Pagination for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::PaginationSettings;

/// A requested page, as given in the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    /// One-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Requested page size.
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PageRequest {
    /// Resolves the request against the configured defaults.
    ///
    /// Page 0 is treated as page 1 and the page size is clamped to
    /// `1..=max_per_page`.
    ///
    /// # Example
    ///
    /// ```
    /// use bizhub::config::PaginationSettings;
    /// use bizhub::models::PageRequest;
    ///
    /// let req = PageRequest { page: Some(0), per_page: Some(500) };
    /// assert_eq!(req.resolve(PaginationSettings::default()), (1, 100));
    /// ```
    pub fn resolve(&self, settings: PaginationSettings) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(settings.default_per_page)
            .clamp(1, settings.max_per_page.max(1));
        (page, per_page)
    }
}

/// Page metadata returned alongside list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// The returned page.
    pub current_page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total matching records.
    pub total: u64,
    /// The last page number (at least 1).
    pub last_page: u32,
}

/// One page of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page.
    pub data: Vec<T>,
    /// Page metadata.
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Slices `items` into the requested page.
    pub fn paginate(items: Vec<T>, request: PageRequest, settings: PaginationSettings) -> Self {
        let (page, per_page) = request.resolve(settings);
        let total = items.len() as u64;
        let last_page = total.div_ceil(u64::from(per_page)).max(1) as u32;
        let skip = (page as usize - 1).saturating_mul(per_page as usize);

        let data = items.into_iter().skip(skip).take(per_page as usize).collect();

        Page {
            data,
            meta: PageMeta {
                current_page: page,
                per_page,
                total,
                last_page,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> PaginationSettings {
        PaginationSettings {
            default_per_page: 2,
            max_per_page: 10,
        }
    }

    #[test]
    fn test_first_page_with_defaults() {
        let page = Page::paginate(vec![1, 2, 3, 4, 5], PageRequest::default(), settings());
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.per_page, 2);
        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.last_page, 3);
    }

    #[test]
    fn test_last_partial_page() {
        let request = PageRequest {
            page: Some(3),
            per_page: None,
        };
        let page = Page::paginate(vec![1, 2, 3, 4, 5], request, settings());
        assert_eq!(page.data, vec![5]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let request = PageRequest {
            page: Some(9),
            per_page: None,
        };
        let page = Page::paginate(vec![1, 2, 3], request, settings());
        assert!(page.data.is_empty());
        assert_eq!(page.meta.last_page, 2);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = Page::<u8>::paginate(vec![], PageRequest::default(), settings());
        assert_eq!(page.meta.total, 0);
        assert_eq!(page.meta.last_page, 1);
    }

    #[test]
    fn test_per_page_is_clamped() {
        let request = PageRequest {
            page: None,
            per_page: Some(0),
        };
        assert_eq!(request.resolve(settings()), (1, 1));
    }
}
