use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::movement::{parse_timestamp, RawMovement};

/// Optional reporting bounds supplied by the caller.
///
/// Bounds are inclusive and used twice: to ask the source for the window,
/// and to label the report's period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl MetricsQuery {
    pub fn new(start_date: Option<DateTime<Utc>>, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Coerce textual bounds (query-string style). Blank text counts as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, CoreError> {
        let coerce = |text: Option<&str>| -> Result<Option<DateTime<Utc>>, CoreError> {
            match text.map(str::trim).filter(|t| !t.is_empty()) {
                Some(t) => parse_timestamp(t).map(Some),
                None => Ok(None),
            }
        };
        Ok(Self {
            start_date: coerce(start)?,
            end_date: coerce(end)?,
        })
    }
}

/// Listing parameters understood by every movement source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Matches description, category name, or (if numeric) the exact value
    pub search: Option<String>,
    /// Page size; `0` returns everything on a single page
    pub limit: usize,
    /// 1-based
    pub page: usize,
}

impl Default for MovementFilter {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            search: None,
            limit: super::settings::DEFAULT_PAGE_LIMIT,
            page: 1,
        }
    }
}

impl MovementFilter {
    /// Everything in the query's window, unpaginated.
    #[must_use]
    pub fn unpaginated(query: &MetricsQuery) -> Self {
        Self {
            start_date: query.start_date,
            end_date: query.end_date,
            search: None,
            limit: 0,
            page: 1,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.page == 0 {
            return Err(CoreError::ValidationError(
                "page numbers start at 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.limit != 0
    }
}

/// Pagination block returned alongside a page of movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    #[must_use]
    pub fn for_filter(filter: &MovementFilter, total: usize) -> Self {
        if !filter.is_paginated() {
            return Self {
                page: 1,
                limit: 0,
                total,
                total_pages: 1,
                has_next: false,
                has_prev: false,
            };
        }
        let total_pages = total.div_ceil(filter.limit);
        Self {
            page: filter.page,
            limit: filter.limit,
            total,
            total_pages,
            has_next: filter.page < total_pages,
            has_prev: filter.page > 1,
        }
    }
}

/// One page of raw movements plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementPage {
    pub data: Vec<RawMovement>,
    pub pagination: Pagination,
}
