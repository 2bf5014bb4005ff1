use crate::engine::AnalyticsEngine;
use crate::error::AnalyticsError;
use crate::format;
use crate::gates::{spans_at_least, BASELINE_MIN_SPAN_DAYS};
use crate::report::{BaselineComparison, FunnelMetrics};
use chrono::{DateTime, Duration, Utc};
use core_types::FunnelEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of the trailing window a baseline is computed over.
pub const ROLLING_WINDOW_DAYS: i64 = 90;

/// Message shown while there is not yet enough history for a baseline.
pub const BASELINE_FORMING_MESSAGE: &str = "Baseline forming: needs 60+ days of history";

/// The metrics a baseline can be computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaselineMetric {
    DepositConversion,
    AvgQuoteValue,
    TotalDeposits,
    QuotesCompleted,
}

impl BaselineMetric {
    pub const ALL: [BaselineMetric; 4] = [
        BaselineMetric::DepositConversion,
        BaselineMetric::AvgQuoteValue,
        BaselineMetric::TotalDeposits,
        BaselineMetric::QuotesCompleted,
    ];

    /// Reads this metric's value out of a set of funnel metrics.
    pub fn extract(&self, metrics: &FunnelMetrics) -> Decimal {
        match self {
            BaselineMetric::DepositConversion => metrics.deposit_conversion_rate,
            BaselineMetric::AvgQuoteValue => metrics.avg_quote_value,
            BaselineMetric::TotalDeposits => metrics.total_deposits_collected,
            BaselineMetric::QuotesCompleted => Decimal::from(metrics.quotes_completed),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            BaselineMetric::DepositConversion => "depositConversion",
            BaselineMetric::AvgQuoteValue => "avgQuoteValue",
            BaselineMetric::TotalDeposits => "totalDeposits",
            BaselineMetric::QuotesCompleted => "quotesCompleted",
        }
    }
}

impl fmt::Display for BaselineMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BaselineMetric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaselineMetric::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| AnalyticsError::UnknownMetric(s.to_string()))
    }
}

/// Whether the snapshot spans enough history to show a baseline.
pub fn should_enable_baseline(events: &[FunnelEvent]) -> bool {
    spans_at_least(events, BASELINE_MIN_SPAN_DAYS)
}

/// Recomputes the full metrics over `[period_end - 90d, period_end]` and
/// extracts one value from them.
///
/// Returns `None` when no event falls inside the window.
pub fn calculate_rolling_90_day_average<F>(
    all_events: &[FunnelEvent],
    period_end: DateTime<Utc>,
    metric_extractor: F,
) -> Option<Decimal>
where
    F: Fn(&FunnelMetrics) -> Decimal,
{
    let window_start = period_end - Duration::days(ROLLING_WINDOW_DAYS);
    let window: Vec<FunnelEvent> = all_events
        .iter()
        .filter(|e| e.timestamp >= window_start && e.timestamp <= period_end)
        .cloned()
        .collect();

    if window.is_empty() {
        tracing::debug!(%period_end, "No events in the rolling baseline window.");
        return None;
    }

    let metrics = AnalyticsEngine::new().calculate(&window);
    Some(metric_extractor(&metrics))
}

pub fn get_baseline_for_metric(
    all_events: &[FunnelEvent],
    period_end: DateTime<Utc>,
    metric: BaselineMetric,
) -> Option<Decimal> {
    calculate_rolling_90_day_average(all_events, period_end, |m| metric.extract(m))
}

/// Compares a current value to its baseline.
///
/// Both directions render the same shape of message:
/// `"<current> vs 90-day avg <baseline> (<+/-pct>%)"`, with the percentage
/// omitted when the baseline is zero or the ratio is out of `Decimal` range.
/// The difference saturates.
pub fn compare_to_baseline(
    current_value: Decimal,
    baseline_value: Option<Decimal>,
    enabled: bool,
) -> BaselineComparison {
    let baseline = match baseline_value {
        Some(baseline) if enabled => baseline,
        _ => {
            return BaselineComparison {
                enabled: false,
                baseline_value: None,
                difference: Decimal::ZERO,
                percentage_difference: None,
                message: BASELINE_FORMING_MESSAGE.to_string(),
            };
        }
    };

    let difference = current_value.saturating_sub(baseline);
    let percentage_difference = difference
        .checked_div(baseline)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    let mut message = format!(
        "{} vs {ROLLING_WINDOW_DAYS}-day avg {}",
        format::round(current_value, 1),
        format::round(baseline, 1)
    );
    if let Some(pct) = percentage_difference {
        message.push_str(&format!(" ({}%)", format::signed(pct, 1)));
    }

    BaselineComparison {
        enabled: true,
        baseline_value: Some(baseline),
        difference,
        percentage_difference,
        message,
    }
}
