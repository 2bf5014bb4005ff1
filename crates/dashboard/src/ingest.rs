use crate::error::DashboardError;
use core_types::FunnelEvent;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// What happened to the records of one export during ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub total: usize,
    pub accepted: usize,
    /// Records that failed to parse (bad timestamp, unknown event type, ...).
    pub skipped: usize,
    /// Well-formed records belonging to another account.
    pub other_account: usize,
}

/// The events accepted from an export, in their original order.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub events: Vec<FunnelEvent>,
    pub summary: IngestSummary,
}

/// Reads and parses an event export from disk.
pub fn load_events(path: &Path, account_id: Option<&str>) -> Result<Ingested, DashboardError> {
    let raw = fs::read_to_string(path).map_err(|source| DashboardError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_events(&raw, account_id)
}

/// Parses a JSON array of funnel events.
///
/// Each record is decoded on its own: a malformed record is skipped and
/// counted rather than failing the whole export. Only a document that is not
/// JSON, or not an array, is an error. When `account_id` is given, events of
/// other accounts are dropped.
pub fn parse_events(raw: &str, account_id: Option<&str>) -> Result<Ingested, DashboardError> {
    let records = match serde_json::from_str::<Value>(raw)? {
        Value::Array(records) => records,
        other => return Err(DashboardError::NotAnArray(json_kind(&other))),
    };

    let mut ingested = Ingested {
        events: Vec::with_capacity(records.len()),
        summary: IngestSummary {
            total: records.len(),
            ..IngestSummary::default()
        },
    };

    for (index, record) in records.into_iter().enumerate() {
        let event = match serde_json::from_value::<FunnelEvent>(record) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed funnel event.");
                ingested.summary.skipped += 1;
                continue;
            }
        };

        if account_id.is_some_and(|account| account != event.account_id) {
            ingested.summary.other_account += 1;
            continue;
        }

        ingested.events.push(event);
    }

    ingested.summary.accepted = ingested.events.len();
    if ingested.summary.other_account > 0 {
        tracing::info!(
            dropped = ingested.summary.other_account,
            "Dropped events belonging to other accounts."
        );
    }

    Ok(ingested)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
