//! # Funnel Dashboard
//!
//! Layer 2 orchestration: ingests an account's event export and runs the
//! analytics pipeline over it to produce one `DashboardReport`.
//!
//! Every call recomputes the report from the full, unfiltered snapshot.
//! Nothing is retained between calls.

use crate::report::{Gates, MetricBaseline};
use crate::window::{baseline_period_end, current_window};
use analytics::{
    AnalyticsEngine, BaselineMetric, FunnelMetrics, calculate_daily_metrics, check_baseline_data,
    check_funnel_data, check_trend_chart_data, compare_to_baseline, completions_trend,
    derive_funnel_steps, generate_micro_insights, get_baseline_for_metric, revenue_trend,
    should_enable_baseline,
};
use chrono::{DateTime, Utc};
use configuration::DashboardSettings;
use core_types::{CompareMode, FunnelEvent};
use std::path::Path;

pub mod error;
pub mod ingest;
pub mod report;
pub mod window;

pub use error::DashboardError;
pub use ingest::{Ingested, IngestSummary, load_events, parse_events};
pub use report::DashboardReport;

/// Builds dashboard reports for one time range and compare mode.
pub struct Dashboard {
    settings: DashboardSettings,
    engine: AnalyticsEngine,
    metrics: Vec<BaselineMetric>,
}

impl Dashboard {
    pub fn new(settings: DashboardSettings) -> Self {
        Self {
            settings,
            engine: AnalyticsEngine::new(),
            metrics: BaselineMetric::ALL.to_vec(),
        }
    }

    /// Restricts the reported baselines to `metrics`. An empty list keeps all
    /// of them.
    ///
    /// Insights still see the deposit conversion baseline when it is not
    /// reported.
    pub fn with_metrics(mut self, metrics: Vec<BaselineMetric>) -> Self {
        if !metrics.is_empty() {
            self.metrics = metrics;
        }
        self
    }

    /// Reads an export from disk, keeping only the configured account if any.
    pub fn ingest(&self, path: &Path) -> Result<Ingested, DashboardError> {
        load_events(path, self.settings.account_id.as_deref())
    }

    /// Runs the whole pipeline over an account's event snapshot.
    ///
    /// `now` is the reference instant for both the current window and the
    /// baseline window, so the same snapshot and `now` give the same report.
    #[tracing::instrument(
        name = "build_dashboard",
        skip(self, events),
        fields(events = events.len(), time_range = %self.settings.time_range)
    )]
    pub fn build(&self, events: &[FunnelEvent], now: DateTime<Utc>) -> DashboardReport {
        // 1. Window
        let current = current_window(events, self.settings.time_range, now);
        tracing::info!(in_window = current.len(), "Building dashboard report.");

        // 2. Metrics and their derived views
        let metrics = self.engine.calculate(&current);
        let funnel_steps = derive_funnel_steps(&metrics);
        let daily = calculate_daily_metrics(&current);

        // 3. Gates
        let gates = Gates {
            trend_chart: check_trend_chart_data(events),
            baseline: check_baseline_data(events),
            funnel: check_funnel_data(metrics.quotes_completed),
        };

        // 4. Baselines
        let mut baselines = match self.settings.compare_mode {
            CompareMode::RollingAvg => self.compare_baselines(events, &metrics, now),
            CompareMode::Off => vec![],
        };
        let baseline_deposit_conversion = baselines
            .iter()
            .find(|b| b.metric == BaselineMetric::DepositConversion && b.comparison.enabled)
            .and_then(|b| b.comparison.baseline_value);

        // 5. Insights
        let insights = generate_micro_insights(
            &current,
            &metrics,
            &funnel_steps,
            baseline_deposit_conversion,
        );
        baselines.retain(|b| self.metrics.contains(&b.metric));

        DashboardReport {
            time_range: self.settings.time_range,
            compare_mode: self.settings.compare_mode,
            generated_at: now,
            completions_trend: completions_trend(&daily),
            revenue_trend: revenue_trend(&daily),
            metrics,
            funnel_steps,
            daily,
            gates,
            baselines,
            insights,
        }
    }

    /// Compares every baseline metric against the trailing window that ends
    /// one period before `now`.
    fn compare_baselines(
        &self,
        all_events: &[FunnelEvent],
        current: &FunnelMetrics,
        now: DateTime<Utc>,
    ) -> Vec<MetricBaseline> {
        let enabled = should_enable_baseline(all_events);
        let period_end = baseline_period_end(self.settings.time_range, now);
        tracing::debug!(enabled, %period_end, "Comparing against rolling baseline.");

        BaselineMetric::ALL
            .into_iter()
            .map(|metric| {
                let current_value = metric.extract(current);
                let baseline = if enabled {
                    get_baseline_for_metric(all_events, period_end, metric)
                } else {
                    None
                };
                MetricBaseline {
                    metric,
                    current_value,
                    comparison: compare_to_baseline(current_value, baseline, enabled),
                }
            })
            .collect()
    }
}
