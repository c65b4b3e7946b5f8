use crate::models::movement::{CategoryRef, NormalizedMovement, RawMovement};

/// Turns raw source records into the canonical shape the metrics stages use.
///
/// Records with an unusable value or date are dropped silently (logged at
/// debug level): a single bad row must never poison the sums with NaN.
pub struct NormalizationService {
    uncategorized_label: String,
}

impl NormalizationService {
    pub fn new(uncategorized_label: impl Into<String>) -> Self {
        Self {
            uncategorized_label: uncategorized_label.into(),
        }
    }

    /// Normalize every usable record, preserving input order.
    pub fn normalize(&self, raw: &[RawMovement]) -> Vec<NormalizedMovement> {
        raw.iter().filter_map(|m| self.normalize_one(m)).collect()
    }

    /// Normalize a single record, or `None` if it has to be dropped.
    pub fn normalize_one(&self, raw: &RawMovement) -> Option<NormalizedMovement> {
        let Some(value) = raw.value.as_ref().and_then(|v| v.to_finite()) else {
            tracing::debug!(movement_id = raw.id, value = ?raw.value, "dropping movement: unusable value");
            return None;
        };
        let Some(date) = raw.timestamp() else {
            tracing::debug!(movement_id = raw.id, date = ?raw.date, "dropping movement: unusable date");
            return None;
        };

        Some(NormalizedMovement {
            id: raw.id,
            movement_type: raw.movement_type,
            value,
            date,
            date_only: date.date_naive(),
            user_id: raw.user_id,
            category_id: raw.category_id,
            category: raw.category.as_ref().map(|c| self.display_category(c)),
            description: raw.description.clone(),
        })
    }

    fn display_category(&self, category: &CategoryRef) -> CategoryRef {
        let name = if category.name.trim().is_empty() {
            self.uncategorized_label.clone()
        } else {
            category.name.clone()
        };
        CategoryRef {
            id: category.id,
            name,
            user_id: category.user_id,
        }
    }
}

impl Default for NormalizationService {
    fn default() -> Self {
        Self::new(crate::models::settings::DEFAULT_UNCATEGORIZED_LABEL)
    }
}
