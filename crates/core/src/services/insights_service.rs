use crate::models::metrics::{CategoryBucket, DailyBucket, Insights, Period, Totals};
use crate::models::movement::{MovementType, NormalizedMovement};

/// Derives extremes, averages and ratios from the grouped data.
///
/// Ties always resolve to the first candidate in the order given:
/// input order for movements, chronological order for days.
pub struct InsightsService;

impl InsightsService {
    pub fn new() -> Self {
        Self
    }

    pub fn derive(
        &self,
        movements: &[NormalizedMovement],
        daily: &[DailyBucket],
        categories: &[CategoryBucket],
        totals: &Totals,
        period: &Period,
    ) -> Insights {
        let income_count = count_of(movements, MovementType::Income);
        let outcome_count = count_of(movements, MovementType::Expense);

        Insights {
            biggest_income: self.biggest(movements, MovementType::Income).cloned(),
            biggest_outcome: self.biggest(movements, MovementType::Expense).cloned(),
            avg_income: average(totals.income, income_count),
            avg_outcome: average(totals.outcome, outcome_count),
            avg_daily_balance: if period.total_days > 0 {
                totals.balance / period.total_days as f64
            } else {
                0.0
            },
            income_outcome_ratio: (totals.outcome > 0.0)
                .then(|| totals.income / totals.outcome)
                .filter(|r| r.is_finite()),
            most_active_day: first_extreme(daily, DailyBucket::activity, |c, best| c > best).cloned(),
            least_active_day: first_extreme(daily, DailyBucket::activity, |c, best| c < best).cloned(),
            category_count: categories.len(),
        }
    }

    /// Largest movement of the given type; first one wins on equal values.
    pub fn biggest<'a>(
        &self,
        movements: &'a [NormalizedMovement],
        movement_type: MovementType,
    ) -> Option<&'a NormalizedMovement> {
        let of_type: Vec<&NormalizedMovement> = movements
            .iter()
            .filter(|m| m.movement_type == movement_type)
            .collect();
        first_extreme(&of_type, |m| m.value, |c, best| c > best).copied()
    }
}

impl Default for InsightsService {
    fn default() -> Self {
        Self::new()
    }
}

/// First item whose key beats every earlier one under `beats`.
///
/// A later item only replaces the current pick when strictly better, so
/// equal keys keep the earliest item.
fn first_extreme<T>(
    items: &[T],
    key: impl Fn(&T) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let k = key(item);
        match best {
            Some((_, best_key)) if !beats(k, best_key) => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

fn count_of(movements: &[NormalizedMovement], movement_type: MovementType) -> usize {
    movements
        .iter()
        .filter(|m| m.movement_type == movement_type)
        .count()
}

fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
