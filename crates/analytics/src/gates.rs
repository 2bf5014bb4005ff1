//! Data sufficiency gates.
//!
//! Each gate is an independent predicate deciding whether a visualization has
//! enough data behind it to be meaningful. A passing gate carries an empty
//! message.

use crate::report::DataGateResult;
use chrono::Duration;
use core_types::FunnelEvent;

/// Minimum span of history before trend charts are shown.
pub const TREND_MIN_SPAN_DAYS: i64 = 14;
/// Minimum span of history before baseline comparison is enabled.
pub const BASELINE_MIN_SPAN_DAYS: i64 = 60;
/// Minimum completed quotes before the funnel is shown.
pub const FUNNEL_MIN_QUOTES: usize = 30;

/// Time between the earliest and latest event, or `None` for an empty set.
pub fn event_span(events: &[FunnelEvent]) -> Option<Duration> {
    let mut timestamps = events.iter().map(|e| e.timestamp);
    let first = timestamps.next()?;
    let (min, max) = timestamps.fold((first, first), |(min, max), ts| (min.min(ts), max.max(ts)));
    Some(max - min)
}

/// True iff the events span at least `days` days (inclusive).
pub fn spans_at_least(events: &[FunnelEvent], days: i64) -> bool {
    event_span(events).is_some_and(|span| span >= Duration::days(days))
}

pub fn check_trend_chart_data(events: &[FunnelEvent]) -> DataGateResult {
    gate(
        spans_at_least(events, TREND_MIN_SPAN_DAYS),
        format!("Trends appear after {TREND_MIN_SPAN_DAYS} days of quote activity."),
    )
}

pub fn check_baseline_data(events: &[FunnelEvent]) -> DataGateResult {
    gate(
        spans_at_least(events, BASELINE_MIN_SPAN_DAYS),
        format!("Baseline comparison needs {BASELINE_MIN_SPAN_DAYS} days of history."),
    )
}

pub fn check_funnel_data(quotes_completed: usize) -> DataGateResult {
    gate(
        quotes_completed >= FUNNEL_MIN_QUOTES,
        format!(
            "The funnel appears after {FUNNEL_MIN_QUOTES} completed quotes ({quotes_completed} so far)."
        ),
    )
}

fn gate(has_minimum_data: bool, insufficient_message: String) -> DataGateResult {
    DataGateResult {
        has_minimum_data,
        message: if has_minimum_data {
            String::new()
        } else {
            insufficient_message
        },
    }
}
