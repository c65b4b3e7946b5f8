use crate::models::chart::{
    ChartData, CumulativeBalancePoint, DailyBalancePoint, IncomeVsOutcomePoint,
};
use crate::models::metrics::DailyBucket;

/// Generates chart-ready series from the daily breakdown.
///
/// Expects `daily` oldest first; every series has one point per bucket,
/// in the same order.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, daily: &[DailyBucket]) -> ChartData {
        ChartData {
            daily_balance: self.daily_balance(daily),
            cumulative_balance: self.cumulative_balance(daily),
            income_vs_outcome: self.income_vs_outcome(daily),
        }
    }

    pub fn daily_balance(&self, daily: &[DailyBucket]) -> Vec<DailyBalancePoint> {
        daily
            .iter()
            .map(|d| DailyBalancePoint {
                date: d.date,
                balance: d.balance,
            })
            .collect()
    }

    /// Running balance, starting from 0 before the first day.
    pub fn cumulative_balance(&self, daily: &[DailyBucket]) -> Vec<CumulativeBalancePoint> {
        daily
            .iter()
            .scan(0.0, |running, d| {
                *running += d.balance;
                Some(CumulativeBalancePoint {
                    date: d.date,
                    value: *running,
                })
            })
            .collect()
    }

    pub fn income_vs_outcome(&self, daily: &[DailyBucket]) -> Vec<IncomeVsOutcomePoint> {
        daily
            .iter()
            .map(|d| IncomeVsOutcomePoint {
                date: d.date,
                income: d.income,
                outcome: d.outcome,
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
