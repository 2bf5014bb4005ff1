use crate::report::{DailyMetrics, TrendPoint};
use chrono::NaiveDate;
use core_types::{EventType, FunnelEvent};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Buckets events by UTC calendar date.
///
/// Only dates with at least one event appear, in ascending order. Daily
/// deposit totals saturate rather than overflow.
pub fn calculate_daily_metrics(events: &[FunnelEvent]) -> Vec<DailyMetrics> {
    let mut days: BTreeMap<NaiveDate, DailyMetrics> = BTreeMap::new();

    for event in events {
        let date = event.timestamp.date_naive();
        let day = days.entry(date).or_insert_with(|| DailyMetrics::new(date));

        match event.event_type {
            EventType::QuoteCompleted => day.quotes_completed += 1,
            EventType::DepositPaid => {
                day.deposits_collected = day
                    .deposits_collected
                    .saturating_add(event.deposit_amount.unwrap_or_default());
            }
            EventType::QuoteStarted | EventType::PriceRevealed | EventType::DepositPageViewed => {}
        }
    }

    days.into_values().collect()
}

/// The completions-per-day chart series.
pub fn completions_trend(daily: &[DailyMetrics]) -> Vec<TrendPoint> {
    trend(daily, |d| Decimal::from(d.quotes_completed))
}

/// The deposit-revenue-per-day chart series.
pub fn revenue_trend(daily: &[DailyMetrics]) -> Vec<TrendPoint> {
    trend(daily, |d| d.deposits_collected)
}

fn trend<F>(daily: &[DailyMetrics], value: F) -> Vec<TrendPoint>
where
    F: Fn(&DailyMetrics) -> Decimal,
{
    daily
        .iter()
        .map(|d| TrendPoint {
            date: d.date.format("%Y-%m-%d").to_string(),
            value: value(d),
        })
        .collect()
}
