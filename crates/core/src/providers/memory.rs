use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::movement::RawMovement;
use crate::models::query::{MovementFilter, MovementPage, Pagination};

use super::traits::MovementSource;

/// A movement source backed by a plain `Vec`.
///
/// Behaves like the relational listing it stands in for: one user at a
/// time, inclusive date window, free-text search, newest id first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMovementSource {
    movements: Vec<RawMovement>,
}

impl InMemoryMovementSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movements(movements: Vec<RawMovement>) -> Self {
        Self { movements }
    }

    pub fn insert(&mut self, movement: RawMovement) {
        self.movements.push(movement);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    fn in_window(movement: &RawMovement, filter: &MovementFilter) -> bool {
        if filter.start_date.is_none() && filter.end_date.is_none() {
            return true;
        }
        // A bounded query can only match rows whose date is readable
        let Some(date) = movement.timestamp() else {
            return false;
        };
        filter.start_date.map_or(true, |start| date >= start)
            && filter.end_date.map_or(true, |end| date <= end)
    }

    fn matches_search(movement: &RawMovement, search: &str) -> bool {
        let in_description = movement
            .description
            .as_deref()
            .is_some_and(|d| d.contains(search));
        let in_category = movement
            .category
            .as_ref()
            .is_some_and(|c| c.name.contains(search));
        let same_value = match leading_number(search) {
            Some(n) => movement
                .value
                .as_ref()
                .and_then(|v| v.to_finite())
                .is_some_and(|v| v == n),
            _ => false,
        };
        in_description || in_category || same_value
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MovementSource for InMemoryMovementSource {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn fetch_movements(
        &self,
        user_id: i64,
        filter: &MovementFilter,
    ) -> Result<MovementPage, CoreError> {
        filter.validate()?;

        // Blank searches are ignored; non-blank ones match verbatim
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty());

        let mut matching: Vec<&RawMovement> = self
            .movements
            .iter()
            .filter(|m| m.user_id == Some(user_id))
            .filter(|m| Self::in_window(m, filter))
            .filter(|m| search.map_or(true, |s| Self::matches_search(m, s)))
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));

        let total = matching.len();
        let data: Vec<RawMovement> = if filter.is_paginated() {
            let skip = (filter.page - 1).saturating_mul(filter.limit);
            matching
                .into_iter()
                .skip(skip)
                .take(filter.limit)
                .cloned()
                .collect()
        } else {
            matching.into_iter().cloned().collect()
        };

        Ok(MovementPage {
            data,
            pagination: Pagination::for_filter(filter, total),
        })
    }
}

/// Longest numeric prefix of `text` (after leading whitespace), if finite.
///
/// `"12abc"` reads as 12, `"abc"` as nothing.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    text.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}
