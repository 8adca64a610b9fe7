use clinic_performance::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn record(module: SourceModule, year: i32, month: u32, amount: Decimal) -> AmountRecord {
    AmountRecord {
        module,
        year,
        month: Some(month),
        amount,
    }
}

fn clinic_records(window: &ReportingWindow) -> ModuleRecords {
    use chrono::Datelike;

    // Stand-in for the data-access collaborator: fabricate a steadily
    // growing clinic, with 2023 months billing less than 2024 months.
    let mut records = ModuleRecords::default();
    let mut year = window.start.year();
    let mut month = window.start.month();

    loop {
        let billed = if year < 2024 { dec!(9000) } else { dec!(11500) };
        records
            .invoices
            .push(record(SourceModule::Invoices, year, month, billed));
        records.payments.push(record(
            SourceModule::Payments,
            year,
            month,
            billed - dec!(400),
        ));
        records
            .expenses
            .push(record(SourceModule::Expenses, year, month, dec!(3200)));
        records
            .payroll
            .push(record(SourceModule::Payroll, year, month, dec!(5400)));

        if (year, month) == (window.end.year(), window.end.month()) {
            break;
        }
        let (next_year, next_month) = shift_year_month(year, month, 1);
        year = next_year;
        month = next_month;
    }

    records
}

fn main() {
    println!("📊 Monthly Performance Overview Demo\n");

    let window = ReportingWindow::parse("2024-01:2024-06").expect("valid window token");
    println!(
        "Reporting window: {} to {} ({} months)\n",
        window.start,
        window.end,
        window.length_months()
    );

    let records = clinic_records(&window);
    let overview = performance_overview(&records, Granularity::Monthly);

    println!("Period     Invoices   Payments   Expenses    Payroll");
    for bucket in &overview.buckets {
        println!(
            "{:<10} {:>8} {:>10} {:>10} {:>10}",
            bucket.period_label,
            bucket.invoices_total,
            bucket.payments_total,
            bucket.expenses_total,
            bucket.payroll_total
        );
    }

    println!("\nSummary:");
    println!("  Total revenue: {}", overview.summary.total_revenue);
    println!("  Total costs:   {}", overview.summary.total_costs);
    println!("  Net profit:    {}", overview.summary.net_profit);
    println!("  Margin:        {}%", overview.summary.profit_margin);

    println!("\n📈 Comparison with the previous 6 months:");
    let result = compare_with_previous(&clinic_records, &window, Granularity::Monthly);
    println!(
        "  Previous window: {} to {}",
        result.previous_window.start, result.previous_window.end
    );
    println!("  Revenue:  {:+}%", result.changes.revenue_pct);
    println!("  Expenses: {:+}%", result.changes.expenses_pct);
    println!("  Payroll:  {:+}%", result.changes.payroll_pct);
    println!("  Profit:   {:+}%", result.changes.profit_pct);

    println!("\nQuarterly view of the same records:");
    let quarterly = performance_overview(&records, Granularity::Quarterly);
    for bucket in &quarterly.buckets {
        println!(
            "  {:<8} invoices {:>8}",
            bucket.period_label, bucket.invoices_total
        );
    }
}
