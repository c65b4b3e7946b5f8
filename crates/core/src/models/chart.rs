use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Chart-ready series, all aligned to the chronological daily list.
///
/// The core computes every number; renderers only draw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub daily_balance: Vec<DailyBalancePoint>,
    pub cumulative_balance: Vec<CumulativeBalancePoint>,
    pub income_vs_outcome: Vec<IncomeVsOutcomePoint>,
}

/// Net result of a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBalancePoint {
    pub date: NaiveDate,
    pub balance: f64,
}

/// Running balance up to and including `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeBalancePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeVsOutcomePoint {
    pub date: NaiveDate,
    pub income: f64,
    pub outcome: f64,
}
