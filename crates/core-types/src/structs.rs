use crate::enums::{DeviceType, EventType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One immutable observation of a customer's progress through a quoting flow.
///
/// Events are produced by an external system and only ever read here.
/// `lawn_size` and `calculated_price` are meaningful on `quote_completed`
/// events, `deposit_amount` and `deposit_percentage` on `deposit_paid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelEvent {
    pub id: String,
    pub account_id: String,
    /// Not unique per event: a quote emits one event per stage it reaches.
    pub quote_id: String,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub device_type: Option<DeviceType>,
    /// Lawn area in square feet.
    #[serde(default)]
    pub lawn_size: Option<Decimal>,
    #[serde(default)]
    pub calculated_price: Option<Decimal>,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
    #[serde(default)]
    pub deposit_percentage: Option<Decimal>,
}

impl FunnelEvent {
    /// Creates an event with an empty contextual payload.
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        quote_id: impl Into<String>,
        event_type: EventType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            quote_id: quote_id.into(),
            event_type,
            timestamp,
            device_type: None,
            lawn_size: None,
            calculated_price: None,
            deposit_amount: None,
            deposit_percentage: None,
        }
    }

    /// Attaches the quote payload carried by `quote_completed` events.
    pub fn with_quote(mut self, lawn_size: Decimal, calculated_price: Decimal) -> Self {
        self.lawn_size = Some(lawn_size);
        self.calculated_price = Some(calculated_price);
        self
    }

    /// Attaches the deposit payload carried by `deposit_paid` events.
    pub fn with_deposit(mut self, amount: Decimal, percentage: Decimal) -> Self {
        self.deposit_amount = Some(amount);
        self.deposit_percentage = Some(percentage);
        self
    }

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type == event_type
    }
}
