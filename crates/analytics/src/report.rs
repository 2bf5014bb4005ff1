use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The aggregate counts and rates derived from one snapshot of funnel events.
///
/// This struct is the output of the `AnalyticsEngine`. It has no identity of
/// its own and is rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelMetrics {
    // I. Stage Counts
    pub quotes_started: usize,
    pub quotes_completed: usize,
    pub price_reveals: usize,
    pub deposit_page_views: usize,
    pub deposits_paid: usize,

    // II. Conversion Rates (percent, 0 when the denominator is 0)
    pub deposit_conversion_rate: Decimal,
    pub reveal_to_deposit_conversion: Decimal,

    // III. Revenue
    pub avg_quote_value: Decimal,
    pub total_deposits_collected: Decimal,

    // IV. Pending Revenue
    pub pending_quotes_count: usize,
    pub pending_quote_value: Decimal,
}

impl FunnelMetrics {
    /// Creates a new, zeroed-out FunnelMetrics.
    pub fn new() -> Self {
        Self {
            quotes_started: 0,
            quotes_completed: 0,
            price_reveals: 0,
            deposit_page_views: 0,
            deposits_paid: 0,
            deposit_conversion_rate: Decimal::ZERO,
            reveal_to_deposit_conversion: Decimal::ZERO,
            avg_quote_value: Decimal::ZERO,
            total_deposits_collected: Decimal::ZERO,
            pending_quotes_count: 0,
            pending_quote_value: Decimal::ZERO,
        }
    }
}

impl Default for FunnelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// One stage of the four-stage visual funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStep {
    pub label: String,
    pub count: usize,
    /// `None` for the first stage or when the previous stage is empty.
    pub conversion_from_previous: Option<Decimal>,
}

/// Per-day totals for one calendar date (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub quotes_completed: usize,
    pub deposits_collected: Decimal,
}

impl DailyMetrics {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            quotes_completed: 0,
            deposits_collected: Decimal::ZERO,
        }
    }
}

/// A single point of a chart series, keyed by ISO date (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: Decimal,
}

/// The result of comparing a current-period value to its rolling baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineComparison {
    pub enabled: bool,
    pub baseline_value: Option<Decimal>,
    pub difference: Decimal,
    /// `None` when the baseline is zero.
    pub percentage_difference: Option<Decimal>,
    pub message: String,
}

/// Whether a visualization has enough underlying data to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGateResult {
    pub has_minimum_data: bool,
    pub message: String,
}

/// A short, rule-generated observation. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroInsight {
    pub text: String,
}
