use crate::report::FunnelMetrics;
use core_types::{EventType, FunnelEvent};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// A stateless calculator for deriving funnel metrics from raw events.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating funnel metrics.
    ///
    /// # Arguments
    ///
    /// * `events` - An account-scoped snapshot of funnel events, in any order.
    ///
    /// # Returns
    ///
    /// The `FunnelMetrics` for the snapshot. Every rate is guarded against a
    /// zero denominator, so this is total over any input, including empty.
    pub fn calculate(&self, events: &[FunnelEvent]) -> FunnelMetrics {
        let mut metrics = FunnelMetrics::new();

        if events.is_empty() {
            return metrics;
        }

        self.calculate_counts(events, &mut metrics);
        self.calculate_rates(&mut metrics);
        self.calculate_revenue(events, &mut metrics);
        self.calculate_pending(events, &mut metrics);

        tracing::debug!(
            events = events.len(),
            quotes_completed = metrics.quotes_completed,
            deposits_paid = metrics.deposits_paid,
            deposit_conversion_rate = %metrics.deposit_conversion_rate,
            "Calculated funnel metrics."
        );

        metrics
    }

    fn calculate_counts(&self, events: &[FunnelEvent], metrics: &mut FunnelMetrics) {
        for event in events {
            match event.event_type {
                EventType::QuoteStarted => metrics.quotes_started += 1,
                EventType::QuoteCompleted => metrics.quotes_completed += 1,
                EventType::PriceRevealed => metrics.price_reveals += 1,
                EventType::DepositPageViewed => metrics.deposit_page_views += 1,
                EventType::DepositPaid => metrics.deposits_paid += 1,
            }
        }
    }

    fn calculate_rates(&self, metrics: &mut FunnelMetrics) {
        metrics.deposit_conversion_rate = percentage(metrics.deposits_paid, metrics.quotes_completed);
        metrics.reveal_to_deposit_conversion = percentage(metrics.deposits_paid, metrics.price_reveals);
    }

    /// Average quote value and total deposits.
    ///
    /// A `quote_completed` event without a price counts towards the average
    /// as zero, and a `deposit_paid` event without an amount adds nothing.
    /// Sums saturate at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
    fn calculate_revenue(&self, events: &[FunnelEvent], metrics: &mut FunnelMetrics) {
        let mut quote_value_sum = Decimal::ZERO;

        for event in events {
            match event.event_type {
                EventType::QuoteCompleted => {
                    quote_value_sum =
                        quote_value_sum.saturating_add(event.calculated_price.unwrap_or_default());
                }
                EventType::DepositPaid => {
                    metrics.total_deposits_collected = metrics
                        .total_deposits_collected
                        .saturating_add(event.deposit_amount.unwrap_or_default());
                }
                EventType::QuoteStarted | EventType::PriceRevealed | EventType::DepositPageViewed => {}
            }
        }

        if metrics.quotes_completed > 0 {
            metrics.avg_quote_value = quote_value_sum / Decimal::from(metrics.quotes_completed);
        }
    }

    /// Revenue still waiting on a deposit.
    ///
    /// The pending count is over distinct quote ids, but the pending value sums
    /// every `quote_completed` event of a pending quote, so a quote that
    /// completed twice contributes its price twice. The sum saturates.
    fn calculate_pending(&self, events: &[FunnelEvent], metrics: &mut FunnelMetrics) {
        let completed_ids: HashSet<&str> = quote_ids(events, EventType::QuoteCompleted);
        let paid_ids: HashSet<&str> = quote_ids(events, EventType::DepositPaid);
        let pending_ids: HashSet<&str> = completed_ids.difference(&paid_ids).copied().collect();

        metrics.pending_quotes_count = pending_ids.len();
        metrics.pending_quote_value = events
            .iter()
            .filter(|e| e.is(EventType::QuoteCompleted) && pending_ids.contains(e.quote_id.as_str()))
            .map(|e| e.calculated_price.unwrap_or_default())
            .fold(Decimal::ZERO, Decimal::saturating_add);
    }
}

/// `numerator / denominator * 100`, or zero when the denominator is zero.
pub(crate) fn percentage(numerator: usize, denominator: usize) -> Decimal {
    if denominator == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(numerator) / Decimal::from(denominator) * Decimal::ONE_HUNDRED
}

fn quote_ids(events: &[FunnelEvent], event_type: EventType) -> HashSet<&str> {
    events
        .iter()
        .filter(|e| e.is(event_type))
        .map(|e| e.quote_id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{completed, day, event, many, paid};
    use rust_decimal_macros::dec;

    #[test]
    fn empty_snapshot_yields_zeroed_metrics() {
        let metrics = AnalyticsEngine::new().calculate(&[]);
        assert_eq!(metrics, FunnelMetrics::new());
        assert_eq!(metrics.deposit_conversion_rate, Decimal::ZERO);
        assert_eq!(metrics.avg_quote_value, Decimal::ZERO);
    }

    #[test]
    fn counts_every_event_type() {
        let mut events = many(EventType::QuoteStarted, 50, day(0));
        events.extend(many(EventType::QuoteCompleted, 40, day(1)));
        events.extend(many(EventType::PriceRevealed, 35, day(2)));
        events.extend(many(EventType::DepositPageViewed, 32, day(3)));
        events.extend(many(EventType::DepositPaid, 30, day(4)));

        let metrics = AnalyticsEngine::new().calculate(&events);
        assert_eq!(metrics.quotes_started, 50);
        assert_eq!(metrics.quotes_completed, 40);
        assert_eq!(metrics.price_reveals, 35);
        assert_eq!(metrics.deposit_page_views, 32);
        assert_eq!(metrics.deposits_paid, 30);
        assert_eq!(metrics.deposit_conversion_rate, dec!(75));
    }

    #[test]
    fn rates_are_zero_without_denominators() {
        let events = many(EventType::DepositPaid, 3, day(0));
        let metrics = AnalyticsEngine::new().calculate(&events);
        assert_eq!(metrics.deposits_paid, 3);
        assert_eq!(metrics.deposit_conversion_rate, Decimal::ZERO);
        assert_eq!(metrics.reveal_to_deposit_conversion, Decimal::ZERO);
    }

    #[test]
    fn reveal_to_deposit_uses_price_reveals() {
        let mut events = many(EventType::PriceRevealed, 8, day(0));
        events.extend(many(EventType::DepositPaid, 2, day(0)));
        let metrics = AnalyticsEngine::new().calculate(&events);
        assert_eq!(metrics.reveal_to_deposit_conversion, dec!(25));
    }

    #[test]
    fn averages_quote_value_and_sums_deposits() {
        let events = vec![
            completed("q-1", day(0), dec!(2000), dec!(100)),
            completed("q-2", day(0), dec!(4000), dec!(200)),
            paid("q-1", day(1), dec!(25)),
            event(EventType::DepositPaid, "q-3", day(1)),
        ];

        let metrics = AnalyticsEngine::new().calculate(&events);
        assert_eq!(metrics.avg_quote_value, dec!(150));
        assert_eq!(metrics.total_deposits_collected, dec!(25));
        assert_eq!(metrics.deposits_paid, 2);
    }

    #[test]
    fn pending_revenue_excludes_paid_quotes() {
        let events = vec![
            completed("q-1", day(0), dec!(2000), dec!(100)),
            completed("q-2", day(0), dec!(2000), dec!(250)),
            paid("q-1", day(1), dec!(25)),
        ];

        let metrics = AnalyticsEngine::new().calculate(&events);
        assert_eq!(metrics.pending_quotes_count, 1);
        assert_eq!(metrics.pending_quote_value, dec!(250));
    }

    #[test]
    fn duplicate_completions_double_count_pending_value() {
        let events = vec![
            completed("q-1", day(0), dec!(2000), dec!(120)),
            completed("q-1", day(0), dec!(2000), dec!(120)),
        ];

        let metrics = AnalyticsEngine::new().calculate(&events);
        assert_eq!(metrics.pending_quotes_count, 1);
        assert_eq!(metrics.pending_quote_value, dec!(240));
    }

    #[test]
    fn conversion_rate_stays_within_bounds() {
        let mut events = many(EventType::QuoteCompleted, 7, day(0));
        events.extend(many(EventType::DepositPaid, 3, day(0)));
        let metrics = AnalyticsEngine::new().calculate(&events);
        assert!(metrics.deposit_conversion_rate > Decimal::ZERO);
        assert!(metrics.deposit_conversion_rate <= Decimal::ONE_HUNDRED);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let huge = dec!(50000000000000000000000000000);
        let events = vec![
            completed("q-1", day(0), dec!(2000), huge),
            completed("q-2", day(0), dec!(2000), huge),
            paid("q-3", day(1), huge),
            paid("q-4", day(1), huge),
        ];

        let metrics = AnalyticsEngine::new().calculate(&events);
        assert_eq!(metrics.pending_quote_value, Decimal::MAX);
        assert_eq!(metrics.total_deposits_collected, Decimal::MAX);
        assert_eq!(metrics.avg_quote_value, Decimal::MAX / Decimal::TWO);
        assert_eq!(metrics.pending_quotes_count, 2);
    }

    #[test]
    fn calculation_is_idempotent() {
        let events = vec![
            completed("q-1", day(0), dec!(2500), dec!(99.95)),
            event(EventType::PriceRevealed, "q-1", day(0)),
            paid("q-1", day(2), dec!(30)),
        ];
        let engine = AnalyticsEngine::new();
        assert_eq!(engine.calculate(&events), engine.calculate(&events));
    }
}
