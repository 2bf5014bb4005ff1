//! Event builders shared by the unit tests of this crate.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_types::{EventType, FunnelEvent};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Midnight UTC on 2024-01-01 plus `day` days.
pub fn day(day: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
}

pub fn event(event_type: EventType, quote_id: &str, at: DateTime<Utc>) -> FunnelEvent {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    FunnelEvent::new(format!("evt-{id}"), "acct-1", quote_id, event_type, at)
}

pub fn completed(quote_id: &str, at: DateTime<Utc>, lawn_size: Decimal, price: Decimal) -> FunnelEvent {
    event(EventType::QuoteCompleted, quote_id, at).with_quote(lawn_size, price)
}

pub fn paid(quote_id: &str, at: DateTime<Utc>, amount: Decimal) -> FunnelEvent {
    event(EventType::DepositPaid, quote_id, at).with_deposit(amount, Decimal::from(25))
}

/// `n` events of one type, each on its own quote, all at `at`.
pub fn many(event_type: EventType, n: usize, at: DateTime<Utc>) -> Vec<FunnelEvent> {
    (0..n)
        .map(|i| event(event_type, &format!("q-{i}"), at))
        .collect()
}
