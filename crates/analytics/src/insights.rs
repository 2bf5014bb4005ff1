use crate::engine::percentage;
use crate::format;
use crate::report::{FunnelMetrics, FunnelStep, MicroInsight};
use core_types::{EventType, FunnelEvent};
use rust_decimal::Decimal;

/// Completed quotes needed before any insight is generated.
pub const INSIGHT_MIN_QUOTES: usize = 100;
/// Lawns below this many square feet count as small.
pub const SMALL_LAWN_SQ_FT: u64 = 3000;
/// Insights are capped at this many, in evaluation order.
pub const MAX_INSIGHTS: usize = 2;

/// Percentage points below baseline before deposit conversion is flagged.
const CONVERSION_GAP_THRESHOLD: Decimal = Decimal::NEGATIVE_ONE;

/// Produces at most two short observations about the funnel.
///
/// Returns nothing until `INSIGHT_MIN_QUOTES` quotes have completed. The
/// candidates are evaluated in a fixed order and the first two that fire are
/// kept, so order rather than severity decides which survive:
///
/// 1. Share of completed quotes for small lawns.
/// 2. Deposit conversion more than one point below its baseline.
/// 3. The funnel step with the weakest conversion below 100%.
pub fn generate_micro_insights(
    events: &[FunnelEvent],
    metrics: &FunnelMetrics,
    funnel_steps: &[FunnelStep],
    baseline_deposit_conversion: Option<Decimal>,
) -> Vec<MicroInsight> {
    if metrics.quotes_completed < INSIGHT_MIN_QUOTES {
        return vec![];
    }

    let candidates = [
        small_lawn_share(events),
        conversion_below_baseline(metrics, baseline_deposit_conversion),
        biggest_drop_off(funnel_steps),
    ];

    let insights: Vec<MicroInsight> = candidates
        .into_iter()
        .flatten()
        .take(MAX_INSIGHTS)
        .map(|text| MicroInsight { text })
        .collect();

    tracing::debug!(count = insights.len(), "Generated micro-insights.");
    insights
}

fn small_lawn_share(events: &[FunnelEvent]) -> Option<String> {
    let completed: Vec<&FunnelEvent> = events
        .iter()
        .filter(|e| e.is(EventType::QuoteCompleted))
        .collect();
    if completed.is_empty() {
        return None;
    }

    let threshold = Decimal::from(SMALL_LAWN_SQ_FT);
    let small = completed
        .iter()
        .filter(|e| e.lawn_size.is_some_and(|size| size < threshold))
        .count();

    Some(format!(
        "{}% of quotes are under {} sq ft.",
        format::round(percentage(small, completed.len()), 0),
        format::thousands(SMALL_LAWN_SQ_FT)
    ))
}

fn conversion_below_baseline(metrics: &FunnelMetrics, baseline: Option<Decimal>) -> Option<String> {
    let gap = metrics.deposit_conversion_rate - baseline?;
    if gap >= CONVERSION_GAP_THRESHOLD {
        return None;
    }
    Some(format!(
        "Deposit conversion is {} points below your 90-day average.",
        format::round(gap.abs(), 1)
    ))
}

fn biggest_drop_off(funnel_steps: &[FunnelStep]) -> Option<String> {
    let weakest = funnel_steps
        .iter()
        .filter_map(|step| {
            step.conversion_from_previous
                .filter(|c| *c < Decimal::ONE_HUNDRED)
                .map(|c| (step, c))
        })
        .fold(None, |lowest: Option<(&FunnelStep, Decimal)>, candidate| match lowest {
            Some(current) if current.1 <= candidate.1 => Some(current),
            _ => Some(candidate),
        })?;

    Some(format!(
        "Biggest drop-off is at {}: {}% continue from the previous step.",
        weakest.0.label,
        format::round(weakest.1, 0)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalyticsEngine;
    use crate::fixtures::{completed, day};
    use crate::funnel::derive_funnel_steps;
    use rust_decimal_macros::dec;

    fn quotes(total: usize, small: usize) -> Vec<FunnelEvent> {
        (0..total)
            .map(|i| {
                let size = if i < small { dec!(2500) } else { dec!(5000) };
                completed(&format!("q-{i}"), day((i % 75) as i64), size, dec!(120))
            })
            .collect()
    }

    fn step(label: &str, conversion: Option<Decimal>) -> FunnelStep {
        FunnelStep {
            label: label.to_string(),
            count: 10,
            conversion_from_previous: conversion,
        }
    }

    fn metrics_with(quotes_completed: usize, conversion: Decimal) -> FunnelMetrics {
        FunnelMetrics {
            quotes_completed,
            deposit_conversion_rate: conversion,
            ..FunnelMetrics::new()
        }
    }

    #[test]
    fn below_one_hundred_quotes_yields_nothing() {
        let events = quotes(99, 50);
        let metrics = AnalyticsEngine::new().calculate(&events);
        let steps = derive_funnel_steps(&metrics);
        assert!(generate_micro_insights(&events, &metrics, &steps, Some(dec!(90))).is_empty());
        assert!(generate_micro_insights(&[], &FunnelMetrics::new(), &[], None).is_empty());
    }

    #[test]
    fn reports_small_lawn_share() {
        let events = quotes(150, 75);
        let metrics = AnalyticsEngine::new().calculate(&events);
        let steps = derive_funnel_steps(&metrics);

        let insights = generate_micro_insights(&events, &metrics, &steps, None);
        assert_eq!(insights[0].text, "50% of quotes are under 3,000 sq ft.");
    }

    #[test]
    fn flags_conversion_more_than_a_point_below_baseline() {
        let events = quotes(100, 0);
        let metrics = metrics_with(100, dec!(20));

        let insights = generate_micro_insights(&events, &metrics, &[], Some(dec!(22.5)));
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].text, "0% of quotes are under 3,000 sq ft.");
        assert_eq!(insights[1].text, "Deposit conversion is 2.5 points below your 90-day average.");

        let within_a_point = generate_micro_insights(&events, &metrics, &[], Some(dec!(21)));
        assert_eq!(within_a_point.len(), 1);
    }

    #[test]
    fn picks_the_first_lowest_conversion_below_one_hundred() {
        let steps = vec![
            step("Quotes Completed", None),
            step("Price Reveals", Some(dec!(100))),
            step("Deposit Page Views", Some(dec!(40))),
            step("Deposits Paid", Some(dec!(40))),
        ];
        assert_eq!(
            biggest_drop_off(&steps).as_deref(),
            Some("Biggest drop-off is at Deposit Page Views: 40% continue from the previous step.")
        );
        assert_eq!(biggest_drop_off(&steps[..2]), None);
    }

    #[test]
    fn keeps_only_the_first_two_that_fire() {
        let events = quotes(120, 30);
        let metrics = metrics_with(120, dec!(10));
        let steps = vec![step("Quotes Completed", None), step("Price Reveals", Some(dec!(60)))];

        let insights = generate_micro_insights(&events, &metrics, &steps, Some(dec!(20)));
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].text, "25% of quotes are under 3,000 sq ft.");
        assert!(insights[1].text.starts_with("Deposit conversion is 10 points"));

        let no_baseline = generate_micro_insights(&events, &metrics, &steps, None);
        assert_eq!(no_baseline.len(), 2);
        assert!(no_baseline[1].text.starts_with("Biggest drop-off is at Price Reveals"));
    }
}
