//! # Clinic Performance
//!
//! A library for turning raw clinic transaction records (invoices, payments,
//! expenses, payroll, doctor activity) into period performance reports,
//! period-over-period comparisons, and monthly doctor payout statements.
//!
//! ## Core Concepts
//!
//! - **Amount Records**: Flat transactional facts from four modules, already
//!   fetched by the caller and normalized once at ingestion
//! - **Period Buckets**: Calendar-keyed aggregation rows (monthly, quarterly,
//!   or yearly) holding the summed amounts of every module
//! - **Performance Summary**: Revenue, costs, net profit, and profit margin
//!   over a full bucket set
//! - **Comparative Window**: An immediately preceding window of equal length,
//!   used for signed percentage deltas per metric
//! - **Doctor Payouts**: Base salary plus a flat revenue-share incentive per
//!   doctor for one month, with reconciling fleet totals
//!
//! Everything is a pure function of its inputs: no fetching, no persistence,
//! no caching. Monetary values are `rust_decimal::Decimal` throughout, so
//! sums are exact and repeatable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use clinic_performance::*;
//!
//! let records = ModuleRecords {
//!     invoices: vec![AmountRecord {
//!         module: SourceModule::Invoices,
//!         year: 2024,
//!         month: Some(1),
//!         amount: "150.00".parse().unwrap(),
//!     }],
//!     ..Default::default()
//! };
//!
//! let overview = performance_overview(&records, Granularity::Monthly);
//! assert_eq!(overview.buckets[0].period_label, "Jan 2024");
//! ```

pub mod aggregator;
pub mod comparative;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod payout;
pub mod period;
pub mod schema;
pub mod utils;

pub use aggregator::{aggregate_module, merge_buckets, BucketMap, PeriodBucket};
pub use comparative::{
    percentage_change, ComparativeAnalyzer, ComparativeResult, MetricChanges, RecordSource,
};
pub use engine::{PerformanceEngine, PerformanceOverview, PerformanceSummary};
pub use error::{ReportError, Result};
pub use ingestion::*;
pub use payout::{DoctorPayoutCalculator, DoctorPayoutRecord, PayoutReport, PayoutTotals};
pub use period::PeriodKey;
pub use schema::*;
pub use utils::*;

use log::info;

/// Buckets a window's records at the given granularity and computes the
/// summary, with default revenue source and missing-month policy.
pub fn performance_overview(
    records: &ModuleRecords,
    granularity: Granularity,
) -> PerformanceOverview {
    PerformanceEngine::new(granularity).overview(records)
}

/// Compares a window against its immediately preceding equal-length window,
/// fetching both record sets through `source`.
pub fn compare_with_previous<S: RecordSource>(
    source: &S,
    window: &ReportingWindow,
    granularity: Granularity,
) -> ComparativeResult {
    info!(
        "Running comparative analysis for {} to {}",
        window.start, window.end
    );
    ComparativeAnalyzer::new(PerformanceEngine::new(granularity)).compare(source, window)
}

/// Computes the monthly payout statement for a clinic roster.
pub fn doctor_payouts(year: i32, month: u32, roster: &[DoctorLedger]) -> Result<PayoutReport> {
    Ok(DoctorPayoutCalculator::new(year, month)?.payouts(roster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(module: SourceModule, year: i32, month: u32, amount: rust_decimal::Decimal) -> AmountRecord {
        AmountRecord {
            module,
            year,
            month: Some(month),
            amount,
        }
    }

    #[test]
    fn test_end_to_end_overview_and_comparison() {
        let source = |window: &ReportingWindow| -> ModuleRecords {
            use chrono::Datelike;
            // One invoice and one expense per month in the window.
            let mut records = ModuleRecords::default();
            let mut year = window.start.year();
            let mut month = window.start.month();
            loop {
                records
                    .invoices
                    .push(record(SourceModule::Invoices, year, month, dec!(1000)));
                records
                    .expenses
                    .push(record(SourceModule::Expenses, year, month, dec!(400)));
                if (year, month) == (window.end.year(), window.end.month()) {
                    break;
                }
                let (next_year, next_month) = shift_year_month(year, month, 1);
                year = next_year;
                month = next_month;
            }
            records
        };

        let window = ReportingWindow::parse("2024-01:2024-03").unwrap();
        let overview = performance_overview(&source.module_records(&window), Granularity::Monthly);

        assert_eq!(overview.buckets.len(), 3);
        assert_eq!(overview.summary.total_revenue, dec!(3000));
        assert_eq!(overview.summary.total_costs, dec!(1200));
        assert_eq!(overview.summary.net_profit, dec!(1800));
        assert_eq!(overview.summary.profit_margin, dec!(60));

        // Both windows see identical per-month activity, so every delta is
        // zero.
        let result = compare_with_previous(&source, &window, Granularity::Monthly);
        assert_eq!(result.changes.revenue_pct, dec!(0));
        assert_eq!(result.changes.profit_pct, dec!(0));
        assert_eq!(result.previous_window, window.previous());
    }

    #[test]
    fn test_end_to_end_doctor_payouts() {
        let roster = vec![DoctorLedger {
            profile: DoctorProfile {
                doctor_id: "d-1".to_string(),
                name: "Dr. Ilyas".to_string(),
                specialization: "Orthopedics".to_string(),
                sales_percentage: dec!(10),
                base_salary: dec!(2000),
            },
            appointments: vec![AppointmentRecord {
                year: 2024,
                month: 3,
            }],
            invoices: vec![InvoiceRecord {
                year: 2024,
                month: 3,
                total_amount: dec!(5000),
            }],
        }];

        let report = doctor_payouts(2024, 3, &roster).unwrap();
        assert_eq!(report.doctors[0].total_payout, dec!(2500));
        assert_eq!(report.totals.total_doctors, 1);
        assert!(report.reconciles());

        assert!(doctor_payouts(2024, 13, &roster).is_err());
    }
}
