//! Shared pagination state.
//!
//! A workspace holds exactly one [`PaginationState`]. Every key pages through
//! it, so selecting a page for one list moves the current page reported for
//! all of them.

use crate::operations::list;
use crate::types::Value;
use serde::{Deserialize, Serialize};

/// Page size and current page, shared across keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// Elements per page. `0` disables pagination.
    pub page_size: usize,

    /// 1-based page last selected by [`PaginationState::page`].
    pub current_page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_size: 0,
            current_page: 1,
        }
    }
}

impl PaginationState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.page_size > 0
    }

    /// Set the page size; negative sizes clamp to `0`.
    pub fn paginate(&mut self, size: i64) {
        self.page_size = size.max(0) as usize;
    }

    /// Number of pages `page` will address for a list of `len` elements.
    ///
    /// This is `ceil((len - 1) / page_size)`, one element short of
    /// [`PaginationState::total_pages`], so the final element can fall
    /// outside every addressable page.
    pub fn addressable_pages(&self, len: usize) -> usize {
        if !self.is_enabled() || len == 0 {
            return 0;
        }
        (len - 1).div_ceil(self.page_size)
    }

    /// Select page `number` of `list` and return its elements.
    ///
    /// Negative numbers count back from the last addressable page and never
    /// go below page 1; positive numbers are capped at the last addressable
    /// page. The selected page becomes the shared current page.
    pub fn page(&mut self, list: &[Value], number: i64) -> Vec<Value> {
        if !self.is_enabled() {
            self.current_page = if number > 0 { number as usize } else { 1 };
            return Vec::new();
        }

        let len = list.len() as i64;
        let size = self.page_size as i64;
        let pages = self.addressable_pages(list.len()) as i64;

        let selected = if number < 0 {
            (pages + number + 1).max(1)
        } else {
            number.min(pages)
        };

        let start = ((selected - 1) * size).min(len);
        let end = (start + size).min(len);

        self.current_page = selected as usize;
        list::slice(list, start as isize, end as isize)
    }

    /// `ceil(len / page_size)`, or `0` while pagination is disabled.
    pub fn total_pages(&self, len: usize) -> usize {
        if !self.is_enabled() {
            return 0;
        }
        len.div_ceil(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::values;

    #[test]
    fn test_first_page() {
        let mut state = PaginationState::default();
        state.paginate(2);
        assert_eq!(state.page(&values([1, 2, 3, 4, 5]), 1), values([1, 2]));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_negative_page_counts_from_last_addressable() {
        let mut state = PaginationState::with_page_size(2);
        let list = values([1, 2, 3, 4, 5]);
        assert_eq!(state.addressable_pages(list.len()), 2);
        assert_eq!(state.page(&list, -1), values([3, 4]));
        assert_eq!(state.current_page, 2);
        assert_eq!(state.page(&list, -10), values([1, 2]));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_positive_page_is_capped() {
        let mut state = PaginationState::with_page_size(2);
        assert_eq!(state.page(&values([1, 2, 3, 4, 5]), 3), values([3, 4]));
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn test_total_pages() {
        let state = PaginationState::with_page_size(2);
        assert_eq!(state.total_pages(5), 3);
        assert_eq!(state.total_pages(4), 2);
        assert_eq!(state.total_pages(0), 0);
    }

    #[test]
    fn test_single_element_list_has_no_addressable_page() {
        let mut state = PaginationState::with_page_size(2);
        assert!(state.page(&values([1]), 1).is_empty());
        assert_eq!(state.current_page, 0);
        assert_eq!(state.total_pages(1), 1);
    }

    #[test]
    fn test_paginate_clamps_negative() {
        let mut state = PaginationState::with_page_size(3);
        state.paginate(-4);
        assert_eq!(state.page_size, 0);
        assert!(!state.is_enabled());
    }

    #[test]
    fn test_disabled_pagination() {
        let mut state = PaginationState::default();
        assert!(state.page(&values([1, 2, 3]), 2).is_empty());
        assert_eq!(state.current_page, 2);
        assert!(state.page(&values([1, 2, 3]), -1).is_empty());
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages(3), 0);
    }
}
