use crate::schema::{Granularity, MissingMonthPolicy};
use crate::utils::{month_abbrev, quarter_of_month};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical bucket key for one calendar span. The derived `Ord` is
/// chronological within a granularity, so a `BTreeMap` keyed by `PeriodKey`
/// iterates buckets in calendar order. One aggregation run always uses a
/// single granularity, so keys never mix variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "PascalCase")]
pub enum PeriodKey {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year { year: i32 },
}

impl PeriodKey {
    /// Maps a record's (year, optional month) to its bucket key, or `None`
    /// when the record has no month and the policy excludes it.
    pub fn resolve(
        year: i32,
        month: Option<u32>,
        granularity: Granularity,
        policy: MissingMonthPolicy,
    ) -> Option<PeriodKey> {
        match granularity {
            Granularity::Yearly => Some(PeriodKey::Year { year }),
            Granularity::Monthly => match (month, policy) {
                (Some(month), _) => Some(PeriodKey::Month { year, month }),
                (None, MissingMonthPolicy::DefaultToFirst) => {
                    Some(PeriodKey::Month { year, month: 1 })
                }
                (None, MissingMonthPolicy::Skip) => None,
            },
            Granularity::Quarterly => match (month, policy) {
                (Some(month), _) => Some(PeriodKey::Quarter {
                    year,
                    quarter: quarter_of_month(month),
                }),
                (None, MissingMonthPolicy::DefaultToFirst) => {
                    Some(PeriodKey::Quarter { year, quarter: 1 })
                }
                (None, MissingMonthPolicy::Skip) => None,
            },
        }
    }

    /// Display label: "Jan 2024", "Q1 2024", or "2024". Presentation only;
    /// ordering always goes through the key itself.
    pub fn label(&self) -> String {
        match self {
            PeriodKey::Month { year, month } => format!("{} {}", month_abbrev(*month), year),
            PeriodKey::Quarter { year, quarter } => format!("Q{} {}", quarter, year),
            PeriodKey::Year { year } => year.to_string(),
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            PeriodKey::Month { year, .. }
            | PeriodKey::Quarter { year, .. }
            | PeriodKey::Year { year } => *year,
        }
    }
}
