use crate::error::{ReportError, Result};
use crate::schema::DoctorLedger;
use log::{debug, info};
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One doctor's computed compensation for the target month.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoctorPayoutRecord {
    pub doctor_id: String,
    pub doctor_name: String,
    pub specialization: String,
    pub appointment_count: usize,
    pub invoice_count: usize,
    pub revenue_generated: Decimal,
    pub sales_percentage: Decimal,
    pub base_salary: Decimal,
    pub sales_incentive: Decimal,
    pub total_payout: Decimal,
    /// Audit string showing the operands the incentive was computed from.
    pub incentive_calculation: String,
}

/// Element-wise sums over all payout records in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PayoutTotals {
    pub total_doctors: usize,
    pub total_revenue: Decimal,
    pub total_sales_incentive: Decimal,
    pub total_payout: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PayoutReport {
    pub year: i32,
    pub month: u32,
    pub doctors: Vec<DoctorPayoutRecord>,
    pub totals: PayoutTotals,
}

impl PayoutReport {
    /// Re-checks the totals against the per-doctor rows. Decimal sums are
    /// exact, so equality holds with no tolerance.
    pub fn reconciles(&self) -> bool {
        let revenue: Decimal = self.doctors.iter().map(|d| d.revenue_generated).sum();
        let incentive: Decimal = self.doctors.iter().map(|d| d.sales_incentive).sum();
        let payout: Decimal = self.doctors.iter().map(|d| d.total_payout).sum();

        self.totals.total_doctors == self.doctors.len()
            && self.totals.total_revenue == revenue
            && self.totals.total_sales_incentive == incentive
            && self.totals.total_payout == payout
    }
}

/// Computes per-doctor compensation for one (year, month): base salary plus
/// a flat revenue-share incentive over the doctor's attributed invoices.
pub struct DoctorPayoutCalculator {
    year: i32,
    month: u32,
}

impl DoctorPayoutCalculator {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ReportError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn payouts(&self, roster: &[DoctorLedger]) -> PayoutReport {
        info!(
            "Computing doctor payouts for {}-{:02} over a roster of {}",
            self.year,
            self.month,
            roster.len()
        );

        let doctors: Vec<DoctorPayoutRecord> = roster
            .iter()
            .map(|ledger| self.payout_for(ledger))
            .collect();

        // Doctors with zero activity stay in the count so the totals
        // reconcile to clinic-wide figures.
        let totals = PayoutTotals {
            total_doctors: doctors.len(),
            total_revenue: doctors.iter().map(|d| d.revenue_generated).sum(),
            total_sales_incentive: doctors.iter().map(|d| d.sales_incentive).sum(),
            total_payout: doctors.iter().map(|d| d.total_payout).sum(),
        };

        PayoutReport {
            year: self.year,
            month: self.month,
            doctors,
            totals,
        }
    }

    fn payout_for(&self, ledger: &DoctorLedger) -> DoctorPayoutRecord {
        let profile = &ledger.profile;

        let appointment_count = ledger
            .appointments
            .iter()
            .filter(|a| a.year == self.year && a.month == self.month)
            .count();

        let in_window = ledger
            .invoices
            .iter()
            .filter(|i| i.year == self.year && i.month == self.month);

        let mut invoice_count = 0usize;
        let mut revenue_generated = Decimal::ZERO;
        for invoice in in_window {
            invoice_count += 1;
            revenue_generated += invoice.total_amount;
        }

        let sales_incentive = (revenue_generated * profile.sales_percentage
            / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let total_payout = profile.base_salary + sales_incentive;

        let incentive_calculation = format!(
            "{} x {}% = {}",
            revenue_generated, profile.sales_percentage, sales_incentive
        );

        debug!(
            "Doctor {}: {} appointments, {} invoices, revenue {}, payout {}",
            profile.doctor_id, appointment_count, invoice_count, revenue_generated, total_payout
        );

        DoctorPayoutRecord {
            doctor_id: profile.doctor_id.clone(),
            doctor_name: profile.name.clone(),
            specialization: profile.specialization.clone(),
            appointment_count,
            invoice_count,
            revenue_generated,
            sales_percentage: profile.sales_percentage,
            base_salary: profile.base_salary,
            sales_incentive,
            total_payout,
            incentive_calculation,
        }
    }
}
