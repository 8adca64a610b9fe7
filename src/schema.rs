use crate::error::{ReportError, Result};
use crate::utils::{first_day_of_month, last_day_of_month, months_between, shift_year_month};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum SourceModule {
    #[schemars(description = "Billed invoice totals (accrual-side revenue)")]
    Invoices,

    #[schemars(description = "Collected payment totals (cash-side revenue)")]
    Payments,

    #[schemars(description = "Operating expense totals: rent, supplies, utilities")]
    Expenses,

    #[schemars(description = "Staff payroll totals: salaries and wages paid")]
    Payroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Granularity {
    #[schemars(description = "One bucket per calendar month, labeled like 'Jan 2024'")]
    Monthly,

    #[schemars(description = "One bucket per calendar quarter, labeled like 'Q1 2024'")]
    Quarterly,

    #[schemars(description = "One bucket per calendar year, labeled like '2024'")]
    Yearly,
}

/// What to do with a record that has no month under monthly or quarterly
/// bucketing. Yearly bucketing never consults this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum MissingMonthPolicy {
    #[default]
    #[schemars(
        description = "Attribute undated records to January / Q1 of their year (historical behavior)"
    )]
    DefaultToFirst,

    #[schemars(description = "Exclude undated records from monthly and quarterly buckets")]
    Skip,
}

/// Which module column feeds `total_revenue` in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RevenueSource {
    #[default]
    #[schemars(description = "Revenue recognized from billed invoice totals")]
    Invoices,

    #[schemars(description = "Revenue recognized from collected payment totals")]
    Payments,
}

/// One transactional fact from a module, already normalized: the module tag
/// is resolved at ingestion and `amount` is always present (absent upstream
/// amounts become zero there, not here).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AmountRecord {
    #[schemars(description = "Which module this record came from")]
    pub module: SourceModule,

    #[schemars(description = "Calendar year of the transaction")]
    pub year: i32,

    #[schemars(
        description = "Calendar month 1-12. Absent for records only dated to a year; monthly/quarterly bucketing then applies the configured MissingMonthPolicy."
    )]
    pub month: Option<u32>,

    #[schemars(description = "Monetary value of the record in clinic currency")]
    pub amount: Decimal,
}

impl AmountRecord {
    /// Calendar quarter (1-4) of the record, when it has a month.
    pub fn quarter(&self) -> Option<u32> {
        self.month.map(crate::utils::quarter_of_month)
    }
}

/// The four record lists one reporting window resolves to, fetched by the
/// caller and handed in read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ModuleRecords {
    #[schemars(description = "Invoice records in the window")]
    pub invoices: Vec<AmountRecord>,

    #[schemars(description = "Payment records in the window")]
    pub payments: Vec<AmountRecord>,

    #[schemars(description = "Expense records in the window")]
    pub expenses: Vec<AmountRecord>,

    #[schemars(description = "Payroll records in the window")]
    pub payroll: Vec<AmountRecord>,
}

impl ModuleRecords {
    pub fn record_count(&self) -> usize {
        self.invoices.len() + self.payments.len() + self.expenses.len() + self.payroll.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ModuleRecords)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = Self::generate_json_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

/// An inclusive month range. Bounds are normalized to the first day of the
/// start month and the last day of the end month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportingWindow {
    #[schemars(description = "First day of the first month in the window")]
    pub start: NaiveDate,

    #[schemars(description = "Last day of the last month in the window")]
    pub end: NaiveDate,
}

impl ReportingWindow {
    pub fn new(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Result<Self> {
        for month in [start_month, end_month] {
            if !(1..=12).contains(&month) {
                return Err(ReportError::InvalidMonth(month));
            }
        }

        let start = first_day_of_month(start_year, start_month);
        let end = last_day_of_month(end_year, end_month);

        if end < start {
            return Err(ReportError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self { start, end })
    }

    /// Parses a window token in the format "YYYY-MM" or "YYYY-MM:YYYY-MM".
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.split(':').collect();

        match parts.len() {
            1 => {
                let (year, month) = crate::utils::parse_month_token(parts[0])?;
                Self::new(year, month, year, month)
            }
            2 => {
                let (start_year, start_month) = crate::utils::parse_month_token(parts[0])?;
                let (end_year, end_month) = crate::utils::parse_month_token(parts[1])?;
                Self::new(start_year, start_month, end_year, end_month)
            }
            _ => Err(ReportError::WindowParse(token.to_string())),
        }
    }

    /// Inclusive month count of the window.
    pub fn length_months(&self) -> u32 {
        (months_between(self.start, self.end) + 1) as u32
    }

    /// The immediately preceding window of equal length. Not necessarily
    /// calendar-aligned: the previous window of Feb-Apr is Nov-Jan.
    pub fn previous(&self) -> Self {
        let shift = -(self.length_months() as i32);
        let (start_year, start_month) =
            shift_year_month(self.start.year(), self.start.month(), shift);
        let (end_year, end_month) = shift_year_month(self.end.year(), self.end.month(), shift);

        Self {
            start: first_day_of_month(start_year, start_month),
            end: last_day_of_month(end_year, end_month),
        }
    }

    pub fn contains(&self, year: i32, month: u32) -> bool {
        let start_key = (self.start.year(), self.start.month());
        let end_key = (self.end.year(), self.end.month());
        start_key <= (year, month) && (year, month) <= end_key
    }
}

/// Per-doctor compensation configuration from the clinic roster. Absent
/// configuration deserializes to zero rather than failing the report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoctorProfile {
    #[schemars(description = "Stable identifier of the doctor within the clinic")]
    pub doctor_id: String,

    #[schemars(description = "Display name of the doctor")]
    pub name: String,

    #[serde(default)]
    #[schemars(description = "Medical specialization, e.g. 'Dermatology'")]
    pub specialization: String,

    #[serde(default)]
    #[schemars(
        description = "Flat revenue-share rate as a percentage (10 means 10% of attributed revenue). Missing configuration means 0."
    )]
    pub sales_percentage: Decimal,

    #[serde(default)]
    #[schemars(
        description = "Fixed monthly base salary in clinic currency. Missing configuration means 0."
    )]
    pub base_salary: Decimal,
}

/// One appointment attributed to a doctor, dated to a calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AppointmentRecord {
    #[schemars(description = "Calendar year of the appointment")]
    pub year: i32,

    #[schemars(description = "Calendar month 1-12 of the appointment")]
    pub month: u32,
}

/// One invoice attributed to a doctor, dated to a calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceRecord {
    #[schemars(description = "Calendar year of the invoice")]
    pub year: i32,

    #[schemars(description = "Calendar month 1-12 of the invoice")]
    pub month: u32,

    #[schemars(description = "Invoice total in clinic currency")]
    pub total_amount: Decimal,
}

/// A doctor's roster entry plus their attributed activity, as supplied by
/// the data-access collaborator for a payout run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoctorLedger {
    #[schemars(description = "Roster profile and compensation configuration")]
    pub profile: DoctorProfile,

    #[serde(default)]
    #[schemars(description = "Appointments attributed to this doctor")]
    pub appointments: Vec<AppointmentRecord>,

    #[serde(default)]
    #[schemars(description = "Invoices attributed to this doctor")]
    pub invoices: Vec<InvoiceRecord>,
}

impl DoctorLedger {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DoctorLedger)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = Self::generate_json_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_schema_generation() {
        let schema_json = ModuleRecords::schema_as_json().unwrap();
        assert!(schema_json.contains("invoices"));
        assert!(schema_json.contains("payroll"));

        let ledger_schema = DoctorLedger::schema_as_json().unwrap();
        assert!(ledger_schema.contains("sales_percentage"));
        assert!(ledger_schema.contains("base_salary"));
    }

    #[test]
    fn test_record_serialization() {
        let record = AmountRecord {
            module: SourceModule::Invoices,
            year: 2024,
            month: Some(3),
            amount: dec!(199.99),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: AmountRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.year, 2024);
        assert_eq!(back.month, Some(3));
        assert_eq!(back.amount, dec!(199.99));
        assert_eq!(back.quarter(), Some(1));
    }

    #[test]
    fn test_doctor_profile_defaults() {
        let profile: DoctorProfile =
            serde_json::from_str(r#"{"doctor_id": "d-1", "name": "A. Rahman"}"#).unwrap();
        assert_eq!(profile.sales_percentage, Decimal::ZERO);
        assert_eq!(profile.base_salary, Decimal::ZERO);
        assert!(profile.specialization.is_empty());
    }

    #[test]
    fn test_window_normalization() {
        let window = ReportingWindow::new(2024, 2, 2024, 2).unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(window.length_months(), 1);
    }

    #[test]
    fn test_window_validation() {
        assert!(matches!(
            ReportingWindow::new(2024, 13, 2024, 1),
            Err(ReportError::InvalidMonth(13))
        ));
        assert!(matches!(
            ReportingWindow::new(2024, 6, 2024, 1),
            Err(ReportError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_window_parse() {
        let single = ReportingWindow::parse("2023-02").unwrap();
        assert_eq!(single.start, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(single.end, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());

        let range = ReportingWindow::parse("2023-01:2023-03").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 3, 31).unwrap());
        assert_eq!(range.length_months(), 3);

        assert!(ReportingWindow::parse("2023-01:2023-02:2023-03").is_err());
        assert!(ReportingWindow::parse("last-quarter").is_err());
    }

    #[test]
    fn test_previous_window_crosses_year_boundary() {
        let window = ReportingWindow::new(2024, 2, 2024, 4).unwrap();
        let previous = window.previous();
        assert_eq!(previous.start, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
        assert_eq!(previous.end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(previous.length_months(), window.length_months());
    }

    #[test]
    fn test_window_contains() {
        let window = ReportingWindow::new(2023, 11, 2024, 1).unwrap();
        assert!(window.contains(2023, 11));
        assert!(window.contains(2023, 12));
        assert!(window.contains(2024, 1));
        assert!(!window.contains(2024, 2));
        assert!(!window.contains(2023, 10));
    }
}
