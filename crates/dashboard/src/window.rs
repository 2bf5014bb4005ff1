use chrono::{DateTime, Duration, Utc};
use core_types::{FunnelEvent, TimeRange};

/// The events inside the current reporting window `[now - days, now]`.
///
/// `TimeRange::All` keeps every event.
pub fn current_window(events: &[FunnelEvent], range: TimeRange, now: DateTime<Utc>) -> Vec<FunnelEvent> {
    match range.days() {
        Some(days) => {
            let start = now - Duration::days(days);
            events
                .iter()
                .filter(|e| e.timestamp >= start && e.timestamp <= now)
                .cloned()
                .collect()
        }
        None => events.to_vec(),
    }
}

/// Where the trailing baseline window ends: one period length before `now`.
pub fn baseline_period_end(range: TimeRange, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(range.baseline_period_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::EventType;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn events() -> Vec<FunnelEvent> {
        [1, 20, 24, 31]
            .into_iter()
            .map(|d| FunnelEvent::new(format!("e{d}"), "acct", format!("q{d}"), EventType::QuoteStarted, at(d)))
            .collect()
    }

    #[test]
    fn keeps_events_within_the_range() {
        let window = current_window(&events(), TimeRange::Last7Days, at(27));
        let ids: Vec<&str> = window.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e20", "e24"]);
    }

    #[test]
    fn all_keeps_everything() {
        assert_eq!(current_window(&events(), TimeRange::All, at(2)).len(), 4);
    }

    #[test]
    fn baseline_period_ends_one_period_back() {
        assert_eq!(baseline_period_end(TimeRange::Last7Days, at(27)), at(20));
        assert_eq!(
            baseline_period_end(TimeRange::All, at(27)),
            at(27) - Duration::days(365)
        );
    }
}
