//! Normalization of loosely-shaped upstream rows into the typed record
//! model. The CRUD modules deliver JSON with mixed string/number ids,
//! absent amounts, and months that may be missing, zero, or out of range.
//! All defaulting happens here, exactly once; the aggregation stages only
//! ever see clean records.

use crate::schema::{AmountRecord, DoctorProfile, ModuleRecords, SourceModule};
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;

/// Upstream ids arrive as either JSON strings or numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    /// Canonical string form used throughout the typed model.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(text) => f.write_str(text),
            RecordId::Number(number) => write!(f, "{}", number),
        }
    }
}

/// One row as delivered by a module's list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAmountRow {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// One roster row as delivered by the doctors endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDoctorRow {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub sales_percentage: Option<Decimal>,
    #[serde(default)]
    pub base_salary: Option<Decimal>,
}

/// Tags and cleans one module's rows. A missing amount becomes zero; a
/// month outside 1..=12 is warned about and treated as missing, which the
/// aggregation-time `MissingMonthPolicy` then resolves.
pub fn normalize_rows(rows: &[RawAmountRow], module: SourceModule) -> Vec<AmountRecord> {
    rows.iter()
        .map(|row| {
            let month = match row.month {
                Some(month) if (1..=12).contains(&month) => Some(month),
                Some(month) => {
                    warn!(
                        "{:?} record {} has out-of-range month {}; treating as undated",
                        module,
                        row.id.as_ref().map(RecordId::canonical).unwrap_or_default(),
                        month
                    );
                    None
                }
                None => None,
            };

            AmountRecord {
                module,
                year: row.year,
                month,
                amount: row.amount.unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

/// Builds the full window input from the four modules' raw row lists.
pub fn normalize_modules(
    invoices: &[RawAmountRow],
    payments: &[RawAmountRow],
    expenses: &[RawAmountRow],
    payroll: &[RawAmountRow],
) -> ModuleRecords {
    ModuleRecords {
        invoices: normalize_rows(invoices, SourceModule::Invoices),
        payments: normalize_rows(payments, SourceModule::Payments),
        expenses: normalize_rows(expenses, SourceModule::Expenses),
        payroll: normalize_rows(payroll, SourceModule::Payroll),
    }
}

/// Converts a raw roster row to a typed profile, defaulting absent
/// compensation configuration to zero.
pub fn normalize_doctor(row: &RawDoctorRow) -> DoctorProfile {
    DoctorProfile {
        doctor_id: row.id.canonical(),
        name: row.name.clone(),
        specialization: row.specialization.clone().unwrap_or_default(),
        sales_percentage: row.sales_percentage.unwrap_or(Decimal::ZERO),
        base_salary: row.base_salary.unwrap_or(Decimal::ZERO),
    }
}
