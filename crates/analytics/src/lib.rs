//! # Funnel Analytics
//!
//! This crate turns an account's raw, append-only log of funnel events into
//! the figures shown on the quoting dashboard: stage counts and conversion
//! rates, the four-step funnel, per-day trend series, rolling 90-day baseline
//! comparisons, data sufficiency gates and short micro-insights.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It performs no I/O and
//!   depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function is a pure transformation of an
//!   event snapshot (plus, for baselines, a reference instant). Nothing is
//!   cached between calls.
//! - **Safe Division:** Rates over an empty denominator are `0` or `None`,
//!   never NaN or infinity.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: reduces events to `FunnelMetrics`.
//! - `derive_funnel_steps`, `calculate_daily_metrics`: funnel and daily views.
//! - `baseline`: rolling-window baseline and comparison.
//! - `gates`: data sufficiency predicates.
//! - `generate_micro_insights`: rule-based observations.

// Declare the modules that constitute this crate.
pub mod baseline;
pub mod daily;
pub mod engine;
pub mod error;
pub mod funnel;
pub mod gates;
pub mod insights;
pub mod report;

mod format;

#[cfg(test)]
mod fixtures;

// Re-export the key components to create a clean, public-facing API.
pub use baseline::{
    calculate_rolling_90_day_average, compare_to_baseline, get_baseline_for_metric,
    should_enable_baseline, BaselineMetric,
};
pub use daily::{calculate_daily_metrics, completions_trend, revenue_trend};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use funnel::derive_funnel_steps;
pub use gates::{check_baseline_data, check_funnel_data, check_trend_chart_data};
pub use insights::generate_micro_insights;
pub use report::{
    BaselineComparison, DailyMetrics, DataGateResult, FunnelMetrics, FunnelStep, MicroInsight,
    TrendPoint,
};
