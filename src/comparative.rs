use crate::engine::{PerformanceEngine, PerformanceSummary};
use crate::schema::{ModuleRecords, ReportingWindow, SourceModule};
use log::{debug, info};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supplies a window's records. Fetching stays outside the core; the
/// analyzer only decides which windows to ask for.
pub trait RecordSource {
    fn module_records(&self, window: &ReportingWindow) -> ModuleRecords;
}

impl<F> RecordSource for F
where
    F: Fn(&ReportingWindow) -> ModuleRecords,
{
    fn module_records(&self, window: &ReportingWindow) -> ModuleRecords {
        self(window)
    }
}

/// Signed percentage deltas per tracked metric; positive means the current
/// window exceeds the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MetricChanges {
    pub revenue_pct: Decimal,
    pub expenses_pct: Decimal,
    pub payroll_pct: Decimal,
    pub profit_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ComparativeResult {
    pub current_window: ReportingWindow,
    pub previous_window: ReportingWindow,
    pub current: PerformanceSummary,
    pub previous: PerformanceSummary,
    pub changes: MetricChanges,
}

/// Percentage change from `previous` to `current` with a three-way guard:
/// a zero baseline yields 100 when something grew from nothing and 0 when
/// nothing happened in either window. Always finite.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    } else {
        (current - previous) / previous * Decimal::ONE_HUNDRED
    }
}

/// Runs the engine over a window and its immediately preceding equal-length
/// window, and reports the metric deltas between the two.
pub struct ComparativeAnalyzer {
    engine: PerformanceEngine,
}

impl ComparativeAnalyzer {
    pub fn new(engine: PerformanceEngine) -> Self {
        Self { engine }
    }

    pub fn compare<S: RecordSource>(
        &self,
        source: &S,
        window: &ReportingWindow,
    ) -> ComparativeResult {
        let previous_window = window.previous();
        info!(
            "Comparing {} to {} against previous window {} to {}",
            window.start, window.end, previous_window.start, previous_window.end
        );

        // The two windows are independent; callers that prefetch can run
        // them in parallel and hand both record sets through the source.
        let current_overview = self.engine.overview(&source.module_records(window));
        let previous_overview = self
            .engine
            .overview(&source.module_records(&previous_window));

        let changes = MetricChanges {
            revenue_pct: percentage_change(
                current_overview.summary.total_revenue,
                previous_overview.summary.total_revenue,
            ),
            expenses_pct: percentage_change(
                current_overview.module_total(SourceModule::Expenses),
                previous_overview.module_total(SourceModule::Expenses),
            ),
            payroll_pct: percentage_change(
                current_overview.module_total(SourceModule::Payroll),
                previous_overview.module_total(SourceModule::Payroll),
            ),
            profit_pct: percentage_change(
                current_overview.summary.net_profit,
                previous_overview.summary.net_profit,
            ),
        };

        debug!(
            "Metric changes: revenue {}% expenses {}% payroll {}% profit {}%",
            changes.revenue_pct, changes.expenses_pct, changes.payroll_pct, changes.profit_pct
        );

        ComparativeResult {
            current_window: *window,
            previous_window,
            current: current_overview.summary,
            previous: previous_overview.summary,
            changes,
        }
    }
}
