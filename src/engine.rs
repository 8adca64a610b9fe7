use crate::aggregator::{aggregate_module, merge_buckets, PeriodBucket};
use crate::schema::{Granularity, MissingMonthPolicy, ModuleRecords, RevenueSource, SourceModule};
use log::{debug, info};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Summary statistics over a full bucket set. Derived per request, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceSummary {
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
    pub net_profit: Decimal,
    /// Net profit as a percentage of revenue; zero when revenue is zero.
    pub profit_margin: Decimal,
}

impl PerformanceSummary {
    pub fn zero() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_costs: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            profit_margin: Decimal::ZERO,
        }
    }
}

/// The full output of one overview run: buckets in chronological order plus
/// the summary over all of them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceOverview {
    pub granularity: Granularity,
    pub buckets: Vec<PeriodBucket>,
    pub summary: PerformanceSummary,
}

impl PerformanceOverview {
    /// Sum of one module's column across all buckets.
    pub fn module_total(&self, module: SourceModule) -> Decimal {
        self.buckets
            .iter()
            .map(|bucket| bucket.module_total(module))
            .sum()
    }
}

/// Buckets the four module record lists of a window into calendar periods
/// and computes the overall summary. Stateless apart from its three knobs;
/// safe to reuse across windows and threads.
pub struct PerformanceEngine {
    granularity: Granularity,
    revenue_source: RevenueSource,
    missing_month: MissingMonthPolicy,
}

impl PerformanceEngine {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            revenue_source: RevenueSource::default(),
            missing_month: MissingMonthPolicy::default(),
        }
    }

    pub fn with_revenue_source(mut self, revenue_source: RevenueSource) -> Self {
        self.revenue_source = revenue_source;
        self
    }

    pub fn with_missing_month_policy(mut self, policy: MissingMonthPolicy) -> Self {
        self.missing_month = policy;
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn overview(&self, records: &ModuleRecords) -> PerformanceOverview {
        info!(
            "Computing {:?} performance overview over {} records",
            self.granularity,
            records.record_count()
        );

        // Each module folds independently; the same key scheme guarantees
        // that records for the same calendar span land in the same bucket
        // after the merge.
        let mut merged = aggregate_module(&records.invoices, self.granularity, self.missing_month);
        for list in [&records.payments, &records.expenses, &records.payroll] {
            merged = merge_buckets(
                merged,
                aggregate_module(list, self.granularity, self.missing_month),
            );
        }

        // BTreeMap iteration is already chronological via PeriodKey's Ord.
        let buckets: Vec<PeriodBucket> = merged.into_values().collect();
        let summary = self.summarize(&buckets);

        debug!(
            "Overview produced {} buckets; revenue {} costs {} profit {}",
            buckets.len(),
            summary.total_revenue,
            summary.total_costs,
            summary.net_profit
        );

        PerformanceOverview {
            granularity: self.granularity,
            buckets,
            summary,
        }
    }

    fn summarize(&self, buckets: &[PeriodBucket]) -> PerformanceSummary {
        let revenue_module = match self.revenue_source {
            RevenueSource::Invoices => SourceModule::Invoices,
            RevenueSource::Payments => SourceModule::Payments,
        };

        let total_revenue: Decimal = buckets
            .iter()
            .map(|bucket| bucket.module_total(revenue_module))
            .sum();
        let total_costs: Decimal = buckets
            .iter()
            .map(|bucket| bucket.expenses_total + bucket.payroll_total)
            .sum();
        let net_profit = total_revenue - total_costs;

        // Decimal division by zero panics, so the guard is load-bearing.
        let profit_margin = if total_revenue > Decimal::ZERO {
            net_profit / total_revenue * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        PerformanceSummary {
            total_revenue,
            total_costs,
            net_profit,
            profit_margin,
        }
    }
}
