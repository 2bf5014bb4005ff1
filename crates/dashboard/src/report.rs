use analytics::{
    BaselineComparison, BaselineMetric, DailyMetrics, DataGateResult, FunnelMetrics, FunnelStep,
    MicroInsight, TrendPoint,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use core_types::{CompareMode, TimeRange};
use serde::Serialize;

/// Everything the dashboard renders for one request, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub time_range: TimeRange,
    pub compare_mode: CompareMode,
    pub generated_at: DateTime<Utc>,
    pub metrics: FunnelMetrics,
    pub funnel_steps: Vec<FunnelStep>,
    pub daily: Vec<DailyMetrics>,
    pub completions_trend: Vec<TrendPoint>,
    pub revenue_trend: Vec<TrendPoint>,
    pub gates: Gates,
    /// One entry per baseline metric when comparing; empty otherwise.
    pub baselines: Vec<MetricBaseline>,
    pub insights: Vec<MicroInsight>,
}

/// The three data sufficiency gates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gates {
    pub trend_chart: DataGateResult,
    pub baseline: DataGateResult,
    pub funnel: DataGateResult,
}

/// A current-period value next to its rolling baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBaseline {
    pub metric: BaselineMetric,
    pub current_value: Decimal,
    pub comparison: BaselineComparison,
}

impl DashboardReport {
    pub fn baseline(&self, metric: BaselineMetric) -> Option<&MetricBaseline> {
        self.baselines.iter().find(|b| b.metric == metric)
    }
}
