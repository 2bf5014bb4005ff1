use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of stages a quote can emit while moving through the funnel.
///
/// Variants are declared in canonical funnel order. `QuoteStarted` is tracked
/// but is not part of the four-stage visual funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    QuoteStarted,
    QuoteCompleted,
    PriceRevealed,
    DepositPageViewed,
    DepositPaid,
}

impl EventType {
    /// Every event type, in canonical order.
    pub const ALL: [EventType; 5] = [
        EventType::QuoteStarted,
        EventType::QuoteCompleted,
        EventType::PriceRevealed,
        EventType::DepositPageViewed,
        EventType::DepositPaid,
    ];

    /// The stages shown in the visual funnel, first to last.
    pub const FUNNEL_STAGES: [EventType; 4] = [
        EventType::QuoteCompleted,
        EventType::PriceRevealed,
        EventType::DepositPageViewed,
        EventType::DepositPaid,
    ];

    /// The wire name of the event type, e.g. `quote_completed`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::QuoteStarted => "quote_started",
            EventType::QuoteCompleted => "quote_completed",
            EventType::PriceRevealed => "price_revealed",
            EventType::DepositPageViewed => "deposit_page_viewed",
            EventType::DepositPaid => "deposit_paid",
        }
    }

    /// Human-readable label used for funnel steps and reports.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::QuoteStarted => "Quotes Started",
            EventType::QuoteCompleted => "Quotes Completed",
            EventType::PriceRevealed => "Price Reveals",
            EventType::DepositPageViewed => "Deposit Page Views",
            EventType::DepositPaid => "Deposits Paid",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownEventType(s.to_string()))
    }
}

/// The device a funnel event was recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    #[serde(other)]
    Unknown,
}

/// The reporting window selected on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Length of the current window in days, or `None` for the whole history.
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeRange::Last7Days => Some(7),
            TimeRange::Last30Days => Some(30),
            TimeRange::Last90Days => Some(90),
            TimeRange::All => None,
        }
    }

    /// Period length used to position the baseline window.
    ///
    /// `All` maps to 365 days here, not to the full history.
    pub fn baseline_period_days(&self) -> i64 {
        self.days().unwrap_or(365)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
            TimeRange::All => "all",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            "90d" => Ok(TimeRange::Last90Days),
            "all" => Ok(TimeRange::All),
            other => Err(CoreError::InvalidInput(
                "time range".to_string(),
                format!("'{other}' (expected 7d, 30d, 90d or all)"),
            )),
        }
    }
}

/// Whether the dashboard compares the current period against a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    #[default]
    Off,
    RollingAvg,
}

impl CompareMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareMode::Off => "off",
            CompareMode::RollingAvg => "rolling_avg",
        }
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(CompareMode::Off),
            "rolling_avg" => Ok(CompareMode::RollingAvg),
            other => Err(CoreError::InvalidInput(
                "compare mode".to_string(),
                format!("'{other}' (expected off or rolling_avg)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_through_wire_name() {
        for event_type in EventType::ALL {
            assert_eq!(event_type.as_str().parse::<EventType>(), Ok(event_type));
        }
        assert_eq!(
            "quote_abandoned".parse::<EventType>(),
            Err(CoreError::UnknownEventType("quote_abandoned".to_string()))
        );
    }

    #[test]
    fn funnel_stages_exclude_quote_started() {
        assert!(!EventType::FUNNEL_STAGES.contains(&EventType::QuoteStarted));
        assert_eq!(EventType::FUNNEL_STAGES[0], EventType::QuoteCompleted);
        assert_eq!(EventType::FUNNEL_STAGES[3], EventType::DepositPaid);
    }

    #[test]
    fn all_time_range_uses_a_year_for_baseline_positioning() {
        assert_eq!(TimeRange::All.days(), None);
        assert_eq!(TimeRange::All.baseline_period_days(), 365);
        assert_eq!(TimeRange::Last7Days.baseline_period_days(), 7);
    }

    #[test]
    fn time_range_and_compare_mode_deserialize_from_wire_names() {
        let range: TimeRange = serde_json::from_str("\"90d\"").unwrap();
        assert_eq!(range, TimeRange::Last90Days);
        let mode: CompareMode = serde_json::from_str("\"rolling_avg\"").unwrap();
        assert_eq!(mode, CompareMode::RollingAvg);
        assert!("14d".parse::<TimeRange>().is_err());
    }

    #[test]
    fn unrecognised_device_type_maps_to_unknown() {
        let device: DeviceType = serde_json::from_str("\"smart_tv\"").unwrap();
        assert_eq!(device, DeviceType::Unknown);
    }
}
