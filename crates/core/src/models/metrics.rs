use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::chart::ChartData;
use super::movement::NormalizedMovement;

/// The metrics report for one user over one period.
///
/// Field names serialize in camelCase and must stay stable: dashboards key
/// directly on paths like `chartData.cumulativeBalance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub period: Period,
    pub totals: Totals,
    /// One bucket per calendar day, oldest first
    pub daily: Vec<DailyBucket>,
    /// One bucket per category, most financial activity first
    pub categories: Vec<CategoryBucket>,
    pub insights: Insights,
    pub chart_data: ChartData,
}

impl MetricsReport {
    /// A fully shaped, zero-valued report. Bounds are echoed verbatim.
    #[must_use]
    pub fn empty(start_date: Option<DateTime<Utc>>, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            period: Period {
                start_date,
                end_date,
                total_days: 0,
            },
            totals: Totals::default(),
            daily: Vec::new(),
            categories: Vec::new(),
            insights: Insights::default(),
            chart_data: ChartData::default(),
        }
    }
}

/// Resolved reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Inclusive day count; 0 only for an empty report
    pub total_days: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub income: f64,
    pub outcome: f64,
    /// income - outcome
    pub balance: f64,
    pub movement_count: usize,
}

/// Everything that happened on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub income: f64,
    pub outcome: f64,
    pub balance: f64,
    /// In processing order, not necessarily chronological
    pub movements: Vec<NormalizedMovement>,
}

impl DailyBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            income: 0.0,
            outcome: 0.0,
            balance: 0.0,
            movements: Vec::new(),
        }
    }

    /// Add a movement to the running sums and keep `balance` in step.
    pub fn fold(&mut self, movement: &NormalizedMovement) {
        if movement.is_income() {
            self.income += movement.value;
        } else {
            self.outcome += movement.value;
        }
        self.balance = self.income - self.outcome;
        self.movements.push(movement.clone());
    }

    /// Total money moved that day, regardless of direction.
    #[must_use]
    pub fn activity(&self) -> f64 {
        self.income + self.outcome
    }
}

/// Grouping key for category buckets.
///
/// Uncategorized movements get their own variant so a real category with
/// id 0 never merges into the reserved bucket. On the wire the reserved
/// bucket is still `categoryId: 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum CategoryKey {
    Assigned(i64),
    Uncategorized,
}

impl From<i64> for CategoryKey {
    fn from(id: i64) -> Self {
        if id == 0 {
            CategoryKey::Uncategorized
        } else {
            CategoryKey::Assigned(id)
        }
    }
}

impl From<CategoryKey> for i64 {
    fn from(key: CategoryKey) -> Self {
        match key {
            CategoryKey::Assigned(id) => id,
            CategoryKey::Uncategorized => 0,
        }
    }
}

impl CategoryKey {
    /// Joined category id first, then the bare foreign key, then uncategorized.
    #[must_use]
    pub fn of(movement: &NormalizedMovement) -> Self {
        movement
            .category
            .as_ref()
            .map(|c| c.id)
            .or(movement.category_id)
            .map_or(CategoryKey::Uncategorized, CategoryKey::Assigned)
    }
}

/// Totals for one category across the whole period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    pub category_id: CategoryKey,
    pub name: String,
    pub income: f64,
    pub outcome: f64,
    pub movement_count: usize,
    /// Share of the period's income, 0..=100
    pub percent_of_total_income: f64,
    /// Share of the period's outcome, 0..=100
    pub percent_of_total_outcome: f64,
}

impl CategoryBucket {
    pub fn new(category_id: CategoryKey, name: impl Into<String>) -> Self {
        Self {
            category_id,
            name: name.into(),
            income: 0.0,
            outcome: 0.0,
            movement_count: 0,
            percent_of_total_income: 0.0,
            percent_of_total_outcome: 0.0,
        }
    }

    pub fn fold(&mut self, movement: &NormalizedMovement) {
        self.movement_count += 1;
        if movement.is_income() {
            self.income += movement.value;
        } else {
            self.outcome += movement.value;
        }
    }

    #[must_use]
    pub fn activity(&self) -> f64 {
        self.income + self.outcome
    }
}

/// Higher-order statistics derived from totals and buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub biggest_income: Option<NormalizedMovement>,
    pub biggest_outcome: Option<NormalizedMovement>,
    pub avg_income: f64,
    pub avg_outcome: f64,
    pub avg_daily_balance: f64,
    /// `None` whenever there was no outcome or the ratio is not finite
    pub income_outcome_ratio: Option<f64>,
    pub most_active_day: Option<DailyBucket>,
    pub least_active_day: Option<DailyBucket>,
    pub category_count: usize,
}
