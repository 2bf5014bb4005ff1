use crate::engine::percentage;
use crate::report::{FunnelMetrics, FunnelStep};
use core_types::EventType;

/// Re-expresses metrics as the fixed four-stage conversion chain:
/// Quotes Completed, Price Reveals, Deposit Page Views, Deposits Paid.
///
/// Each step after the first carries its conversion from the step before it,
/// or `None` when that step has no events.
pub fn derive_funnel_steps(metrics: &FunnelMetrics) -> Vec<FunnelStep> {
    let mut steps: Vec<FunnelStep> = Vec::with_capacity(EventType::FUNNEL_STAGES.len());
    let mut previous: Option<usize> = None;

    for stage in EventType::FUNNEL_STAGES {
        let count = stage_count(metrics, stage);
        let conversion_from_previous = match previous {
            Some(prev) if prev > 0 => Some(percentage(count, prev)),
            _ => None,
        };
        steps.push(FunnelStep {
            label: stage.label().to_string(),
            count,
            conversion_from_previous,
        });
        previous = Some(count);
    }

    steps
}

fn stage_count(metrics: &FunnelMetrics, stage: EventType) -> usize {
    match stage {
        EventType::QuoteStarted => metrics.quotes_started,
        EventType::QuoteCompleted => metrics.quotes_completed,
        EventType::PriceRevealed => metrics.price_reveals,
        EventType::DepositPageViewed => metrics.deposit_page_views,
        EventType::DepositPaid => metrics.deposits_paid,
    }
}
