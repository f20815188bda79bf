// Typed query building blocks for error event stores
//
// A store query is assembled in explicit steps: an optional filter, a sort,
// then skip/take. Stores translate these into their own query language.

use crate::error::{Error, Result};
use crate::error_event::ErrorEvent;

/// Default 1-based page number for list requests
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size for list requests
pub const DEFAULT_PAGE_SIZE: i64 = 1000;

// ============================================================================
// EventFilter
// ============================================================================

/// Predicate narrowing which events are counted and returned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Keep only events whose account name contains this substring
    /// (case-sensitive).
    pub account_name_contains: Option<String>,
}

impl EventFilter {
    /// Filter that matches every event
    pub fn all() -> Self {
        Self::default()
    }

    pub fn account_name_contains(keyword: impl Into<String>) -> Self {
        Self {
            account_name_contains: Some(keyword.into()),
        }
    }

    /// Build a filter from an optional search keyword.
    /// Absent and empty keywords both mean "no filter".
    pub fn from_keyword(keyword: Option<&str>) -> Self {
        match keyword {
            Some(k) if !k.is_empty() => Self::account_name_contains(k),
            _ => Self::all(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.account_name_contains.is_none()
    }

    pub fn matches(&self, event: &ErrorEvent) -> bool {
        match &self.account_name_contains {
            Some(keyword) => event.account_name.contains(keyword.as_str()),
            None => true,
        }
    }
}

// ============================================================================
// EventSort
// ============================================================================

/// Fields an event listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortField {
    CreatedTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSort {
    pub field: EventSortField,
    pub direction: SortDirection,
}

impl EventSort {
    pub fn new(field: EventSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Created time descending
    pub fn newest_first() -> Self {
        Self::new(EventSortField::CreatedTime, SortDirection::Descending)
    }
}

impl Default for EventSort {
    fn default() -> Self {
        Self::newest_first()
    }
}

// ============================================================================
// EventQuery
// ============================================================================

/// A filtered, sorted window over the event collection.
///
/// `skip` and `take` apply after the filter and the sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub filter: EventFilter,
    pub sort: EventSort,
    pub skip: u64,
    pub take: u64,
}

impl EventQuery {
    pub fn new(filter: EventFilter) -> Self {
        Self {
            filter,
            sort: EventSort::default(),
            skip: 0,
            take: DEFAULT_PAGE_SIZE as u64,
        }
    }

    pub fn sort(mut self, sort: EventSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = take;
        self
    }
}

// ============================================================================
// ListEventsRequest
// ============================================================================

/// Input for a paginated event listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEventsRequest {
    /// Substring to look for in account names. Empty means no filter.
    pub keyword: Option<String>,
    /// 1-based page number
    pub page: i64,
    pub page_size: i64,
}

impl ListEventsRequest {
    pub fn new() -> Self {
        Self {
            keyword: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Validated `(page, page_size, skip)` where skip = (page - 1) * page_size
    pub fn window(&self) -> Result<(u64, u64, u64)> {
        let page = u64::try_from(self.page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| {
                Error::invalid_pagination(format!("page must be at least 1, got {}", self.page))
            })?;
        let page_size = u64::try_from(self.page_size)
            .ok()
            .filter(|s| *s >= 1)
            .ok_or_else(|| {
                Error::invalid_pagination(format!(
                    "page size must be at least 1, got {}",
                    self.page_size
                ))
            })?;
        // Stores bind skip as a signed 64-bit offset
        let skip = (page - 1)
            .checked_mul(page_size)
            .filter(|s| i64::try_from(*s).is_ok())
            .ok_or_else(|| {
                Error::invalid_pagination(format!(
                    "page {} with page size {} is out of range",
                    page, page_size
                ))
            })?;

        Ok((page, page_size, skip))
    }
}

impl Default for ListEventsRequest {
    fn default() -> Self {
        Self::new()
    }
}
