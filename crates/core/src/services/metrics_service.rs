use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::models::metrics::{CategoryBucket, CategoryKey, DailyBucket, MetricsReport, Period, Totals};
use crate::models::movement::{NormalizedMovement, RawMovement};
use crate::models::settings::Settings;
use crate::services::chart_service::ChartService;
use crate::services::insights_service::InsightsService;
use crate::services::normalization_service::NormalizationService;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// The movement-metrics engine.
///
/// Pure computation with no I/O and no shared state. One call turns one user's
/// movements into a complete [`MetricsReport`]:
/// 1. Normalize raw records (bad rows are dropped)
/// 2. Resolve the period and the totals
/// 3. Group by calendar day, then by category
/// 4. Derive insights and chart series from the groupings
pub struct MetricsService {
    normalization_service: NormalizationService,
    insights_service: InsightsService,
    chart_service: ChartService,
    uncategorized_label: String,
}

impl MetricsService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            normalization_service: NormalizationService::new(settings.uncategorized_label.clone()),
            insights_service: InsightsService::new(),
            chart_service: ChartService::new(),
            uncategorized_label: settings.uncategorized_label.clone(),
        }
    }

    /// Compute the full report for a user's raw movements.
    ///
    /// `start_date` / `end_date` only label the period; filtering by date is
    /// the movement source's job.
    pub fn compute(
        &self,
        raw: &[RawMovement],
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> MetricsReport {
        let movements = self.normalization_service.normalize(raw);
        if movements.len() < raw.len() {
            tracing::debug!(
                dropped = raw.len() - movements.len(),
                kept = movements.len(),
                "normalization dropped malformed movements"
            );
        }
        self.compute_normalized(&movements, start_date, end_date)
    }

    /// Same as [`compute`](Self::compute) for already normalized movements.
    pub fn compute_normalized(
        &self,
        movements: &[NormalizedMovement],
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> MetricsReport {
        if movements.is_empty() {
            return MetricsReport::empty(start_date, end_date);
        }

        let period = self.resolve_period(movements, start_date, end_date);
        let totals = self.compute_totals(movements);
        let daily = self.group_daily(movements);
        let categories = self.group_categories(movements, &totals);

        let insights = self
            .insights_service
            .derive(movements, &daily, &categories, &totals, &period);
        let chart_data = self.chart_service.build(&daily);

        tracing::debug!(
            movements = totals.movement_count,
            days = daily.len(),
            categories = categories.len(),
            total_days = period.total_days,
            "movement metrics computed"
        );

        MetricsReport {
            period,
            totals,
            daily,
            categories,
            insights,
            chart_data,
        }
    }

    /// Resolve the effective period.
    ///
    /// Missing bounds fall back to the first / last movement in the order
    /// given (the source decides that order; nothing is re-sorted here).
    pub fn resolve_period(
        &self,
        movements: &[NormalizedMovement],
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Period {
        let start = start_date.or_else(|| movements.first().map(|m| m.date));
        let end = end_date
            .or_else(|| movements.last().map(|m| m.date))
            .or(start);

        let total_days = match (start, end) {
            (Some(s), Some(e)) => inclusive_days(s, e),
            _ => 0,
        };

        Period {
            start_date: start,
            end_date: end,
            total_days,
        }
    }

    pub fn compute_totals(&self, movements: &[NormalizedMovement]) -> Totals {
        let (income, outcome) = movements.iter().fold((0.0, 0.0), |(inc, out), m| {
            if m.is_income() {
                (inc + m.value, out)
            } else {
                (inc, out + m.value)
            }
        });

        Totals {
            income,
            outcome,
            balance: income - outcome,
            movement_count: movements.len(),
        }
    }

    /// One bucket per calendar day, returned oldest first.
    pub fn group_daily(&self, movements: &[NormalizedMovement]) -> Vec<DailyBucket> {
        let mut days: BTreeMap<chrono::NaiveDate, DailyBucket> = BTreeMap::new();
        for m in movements {
            days.entry(m.date_only)
                .or_insert_with(|| DailyBucket::new(m.date_only))
                .fold(m);
        }
        days.into_values().collect()
    }

    /// One bucket per category, biggest activity first.
    ///
    /// Equal activity keeps first-encountered order (`sort_by` is stable).
    pub fn group_categories(
        &self,
        movements: &[NormalizedMovement],
        totals: &Totals,
    ) -> Vec<CategoryBucket> {
        let mut index: HashMap<CategoryKey, usize> = HashMap::new();
        let mut buckets: Vec<CategoryBucket> = Vec::new();

        for m in movements {
            let key = CategoryKey::of(m);
            let slot = *index.entry(key).or_insert_with(|| {
                buckets.push(CategoryBucket::new(key, self.bucket_name(m)));
                buckets.len() - 1
            });
            buckets[slot].fold(m);
        }

        for bucket in &mut buckets {
            bucket.percent_of_total_income = percent_of(bucket.income, totals.income);
            bucket.percent_of_total_outcome = percent_of(bucket.outcome, totals.outcome);
        }

        buckets.sort_by(|a, b| {
            b.activity()
                .partial_cmp(&a.activity())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        buckets
    }

    fn bucket_name(&self, movement: &NormalizedMovement) -> String {
        movement
            .category
            .as_ref()
            .map_or_else(|| self.uncategorized_label.clone(), |c| c.name.clone())
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

/// `ceil(days between) + 1`, never below 1.
fn inclusive_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    let whole_days = -(-millis).div_euclid(MILLIS_PER_DAY);
    (whole_days + 1).max(1)
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
