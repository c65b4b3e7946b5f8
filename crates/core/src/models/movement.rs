use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Direction of a movement. The value itself is always a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementType::Income => write!(f, "INCOME"),
            MovementType::Expense => write!(f, "EXPENSE"),
        }
    }
}

/// A stored monetary value as handed over by the movement source.
///
/// Decimal columns usually arrive as text; some sources hand out plain numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// The value as a finite `f64`, or `None` when it cannot be used
    /// (NaN, infinities, blank or non-numeric text).
    #[must_use]
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// A user-defined category joined onto a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl CategoryRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            user_id: None,
        }
    }
}

/// One transaction exactly as the movement source loaded it.
///
/// Nothing here is trusted: `value` and `date` may be missing or garbage,
/// and the normalization stage decides what survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMovement {
    pub id: i64,

    #[serde(rename = "type")]
    pub movement_type: MovementType,

    /// Non-negative magnitude; the sign is implied by `movement_type`
    #[serde(default)]
    pub value: Option<RawValue>,

    /// Timestamp text (RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`)
    #[serde(default)]
    pub date: Option<String>,

    /// Foreign key, present even when the category row was not joined
    #[serde(default)]
    pub category_id: Option<i64>,

    #[serde(default)]
    pub category: Option<CategoryRef>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub user_id: Option<i64>,
}

impl RawMovement {
    pub fn new(
        id: i64,
        movement_type: MovementType,
        value: impl Into<RawValue>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            movement_type,
            value: Some(value.into()),
            date: Some(date.to_rfc3339()),
            category_id: None,
            category: None,
            description: None,
            user_id: None,
        }
    }

    pub fn income(id: i64, value: f64, date: DateTime<Utc>) -> Self {
        Self::new(id, MovementType::Income, value, date)
    }

    pub fn expense(id: i64, value: f64, date: DateTime<Utc>) -> Self {
        Self::new(id, MovementType::Expense, value, date)
    }

    /// Attach a joined category (sets the foreign key too).
    #[must_use]
    pub fn with_category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.category_id = Some(id);
        self.category = Some(CategoryRef::new(id, name));
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Parsed timestamp, if the stored text is usable.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(|d| parse_timestamp(d).ok())
    }
}

/// A movement that survived normalization: finite value, known date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMovement {
    pub id: i64,

    #[serde(rename = "type")]
    pub movement_type: MovementType,

    pub value: f64,

    pub date: DateTime<Utc>,

    /// Calendar day of `date` in UTC
    pub date_only: NaiveDate,

    pub user_id: Option<i64>,

    pub category_id: Option<i64>,

    /// Joined category with a non-blank display name
    pub category: Option<CategoryRef>,

    pub description: Option<String>,
}

impl NormalizedMovement {
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.movement_type == MovementType::Income
    }
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timestamp the way the movement source and query callers send them.
///
/// Zone-less timestamps and bare dates are taken as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, CoreError> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|e| CoreError::InvalidDate(format!("'{text}': {e}")))
}
