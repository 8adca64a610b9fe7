use crate::period::PeriodKey;
use crate::schema::{AmountRecord, Granularity, MissingMonthPolicy, SourceModule};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// One aggregation row: a calendar span with the summed amounts of every
/// module that landed in it. Slots start at zero and are only ever added to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodBucket {
    pub period: PeriodKey,
    pub period_label: String,
    pub invoices_total: Decimal,
    pub payments_total: Decimal,
    pub expenses_total: Decimal,
    pub payroll_total: Decimal,
}

impl PeriodBucket {
    pub fn empty(period: PeriodKey) -> Self {
        Self {
            period,
            period_label: period.label(),
            invoices_total: Decimal::ZERO,
            payments_total: Decimal::ZERO,
            expenses_total: Decimal::ZERO,
            payroll_total: Decimal::ZERO,
        }
    }

    pub fn module_total(&self, module: SourceModule) -> Decimal {
        match module {
            SourceModule::Invoices => self.invoices_total,
            SourceModule::Payments => self.payments_total,
            SourceModule::Expenses => self.expenses_total,
            SourceModule::Payroll => self.payroll_total,
        }
    }

    fn slot_mut(&mut self, module: SourceModule) -> &mut Decimal {
        match module {
            SourceModule::Invoices => &mut self.invoices_total,
            SourceModule::Payments => &mut self.payments_total,
            SourceModule::Expenses => &mut self.expenses_total,
            SourceModule::Payroll => &mut self.payroll_total,
        }
    }

    /// Adds every slot of `other` into this bucket.
    pub fn absorb(&mut self, other: &PeriodBucket) {
        self.invoices_total += other.invoices_total;
        self.payments_total += other.payments_total;
        self.expenses_total += other.expenses_total;
        self.payroll_total += other.payroll_total;
    }
}

pub type BucketMap = BTreeMap<PeriodKey, PeriodBucket>;

/// Folds one module's records into an owned bucket map. First sight of a
/// period key zero-initializes the bucket; every record then adds its amount
/// into the slot of its module tag. Decimal addition is exact and
/// commutative, so record order never changes the totals.
pub fn aggregate_module(
    records: &[AmountRecord],
    granularity: Granularity,
    policy: MissingMonthPolicy,
) -> BucketMap {
    records.iter().fold(BTreeMap::new(), |mut buckets, record| {
        let Some(key) = PeriodKey::resolve(record.year, record.month, granularity, policy) else {
            return buckets;
        };

        let bucket = buckets
            .entry(key)
            .or_insert_with(|| PeriodBucket::empty(key));
        *bucket.slot_mut(record.module) += record.amount;
        buckets
    })
}

/// Unions two bucket maps, summing slot-wise where both sides have the same
/// period key. Both maps must come from the same granularity.
pub fn merge_buckets(mut left: BucketMap, right: BucketMap) -> BucketMap {
    for (key, bucket) in right {
        match left.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(bucket);
            }
            Entry::Occupied(mut slot) => slot.get_mut().absorb(&bucket),
        }
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn invoice(year: i32, month: u32, amount: Decimal) -> AmountRecord {
        AmountRecord {
            module: SourceModule::Invoices,
            year,
            month: Some(month),
            amount,
        }
    }

    #[test]
    fn test_monthly_bucketing_sums_per_month() {
        let records = vec![
            invoice(2024, 1, dec!(100)),
            invoice(2024, 1, dec!(50)),
            invoice(2024, 2, dec!(30)),
        ];

        let buckets = aggregate_module(
            &records,
            Granularity::Monthly,
            MissingMonthPolicy::DefaultToFirst,
        );

        assert_eq!(buckets.len(), 2);
        let jan = &buckets[&PeriodKey::Month {
            year: 2024,
            month: 1,
        }];
        assert_eq!(jan.period_label, "Jan 2024");
        assert_eq!(jan.invoices_total, dec!(150));
        assert_eq!(jan.payments_total, Decimal::ZERO);

        let feb = &buckets[&PeriodKey::Month {
            year: 2024,
            month: 2,
        }];
        assert_eq!(feb.period_label, "Feb 2024");
        assert_eq!(feb.invoices_total, dec!(30));
    }

    #[test]
    fn test_quarterly_bucketing() {
        let records = vec![
            invoice(2024, 1, dec!(100)),
            invoice(2024, 2, dec!(50)),
            invoice(2024, 4, dec!(30)),
        ];

        let buckets = aggregate_module(
            &records,
            Granularity::Quarterly,
            MissingMonthPolicy::DefaultToFirst,
        );

        assert_eq!(buckets.len(), 2);
        let q1 = &buckets[&PeriodKey::Quarter {
            year: 2024,
            quarter: 1,
        }];
        assert_eq!(q1.period_label, "Q1 2024");
        assert_eq!(q1.invoices_total, dec!(150));

        let q2 = &buckets[&PeriodKey::Quarter {
            year: 2024,
            quarter: 2,
        }];
        assert_eq!(q2.invoices_total, dec!(30));
    }

    #[test]
    fn test_record_order_does_not_change_totals() {
        let mut records = vec![
            invoice(2024, 1, dec!(10.10)),
            invoice(2024, 2, dec!(20.20)),
            invoice(2024, 1, dec!(30.30)),
            invoice(2024, 3, dec!(40.40)),
        ];

        let forward = aggregate_module(
            &records,
            Granularity::Monthly,
            MissingMonthPolicy::DefaultToFirst,
        );
        records.reverse();
        let backward = aggregate_module(
            &records,
            Granularity::Monthly,
            MissingMonthPolicy::DefaultToFirst,
        );

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_partition_invariant() {
        // Aggregating disjoint subsets and merging equals aggregating the
        // whole set at once.
        let all = vec![
            invoice(2024, 1, dec!(100)),
            invoice(2024, 1, dec!(50)),
            invoice(2024, 2, dec!(30)),
            invoice(2024, 2, dec!(0.01)),
        ];
        let (first_half, second_half) = all.split_at(2);

        let whole = aggregate_module(
            &all,
            Granularity::Monthly,
            MissingMonthPolicy::DefaultToFirst,
        );
        let merged = merge_buckets(
            aggregate_module(
                first_half,
                Granularity::Monthly,
                MissingMonthPolicy::DefaultToFirst,
            ),
            aggregate_module(
                second_half,
                Granularity::Monthly,
                MissingMonthPolicy::DefaultToFirst,
            ),
        );

        assert_eq!(whole, merged);
    }

    #[test]
    fn test_missing_month_defaults_to_january() {
        let records = vec![AmountRecord {
            module: SourceModule::Expenses,
            year: 2024,
            month: None,
            amount: dec!(75),
        }];

        let defaulted = aggregate_module(
            &records,
            Granularity::Monthly,
            MissingMonthPolicy::DefaultToFirst,
        );
        assert_eq!(
            defaulted[&PeriodKey::Month {
                year: 2024,
                month: 1
            }]
                .expenses_total,
            dec!(75)
        );

        let skipped =
            aggregate_module(&records, Granularity::Monthly, MissingMonthPolicy::Skip);
        assert!(skipped.is_empty());

        // Yearly bucketing never needs a month, so nothing is ever skipped.
        let yearly = aggregate_module(&records, Granularity::Yearly, MissingMonthPolicy::Skip);
        assert_eq!(yearly[&PeriodKey::Year { year: 2024 }].expenses_total, dec!(75));
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        let buckets = aggregate_module(
            &[],
            Granularity::Monthly,
            MissingMonthPolicy::DefaultToFirst,
        );
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_merge_keeps_modules_in_one_bucket() {
        let invoices = vec![invoice(2024, 1, dec!(100))];
        let payroll = vec![AmountRecord {
            module: SourceModule::Payroll,
            year: 2024,
            month: Some(1),
            amount: dec!(40),
        }];

        let merged = merge_buckets(
            aggregate_module(
                &invoices,
                Granularity::Monthly,
                MissingMonthPolicy::DefaultToFirst,
            ),
            aggregate_module(
                &payroll,
                Granularity::Monthly,
                MissingMonthPolicy::DefaultToFirst,
            ),
        );

        assert_eq!(merged.len(), 1);
        let jan = &merged[&PeriodKey::Month {
            year: 2024,
            month: 1,
        }];
        assert_eq!(jan.invoices_total, dec!(100));
        assert_eq!(jan.payroll_total, dec!(40));
    }
}
