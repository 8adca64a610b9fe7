use anyhow::Result;
use clinic_performance::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn roster() -> Vec<DoctorLedger> {
    let invoice = |year: i32, month: u32, total_amount: Decimal| InvoiceRecord {
        year,
        month,
        total_amount,
    };
    let appointment = |year: i32, month: u32| AppointmentRecord { year, month };

    vec![
        DoctorLedger {
            profile: DoctorProfile {
                doctor_id: "doc-001".to_string(),
                name: "Dr. Amara Okafor".to_string(),
                specialization: "Pediatrics".to_string(),
                sales_percentage: dec!(10),
                base_salary: dec!(2000),
            },
            appointments: vec![appointment(2024, 3), appointment(2024, 3)],
            invoices: vec![invoice(2024, 3, dec!(3000)), invoice(2024, 3, dec!(2000))],
        },
        DoctorLedger {
            profile: DoctorProfile {
                doctor_id: "doc-002".to_string(),
                name: "Dr. Lena Berg".to_string(),
                specialization: "Dermatology".to_string(),
                sales_percentage: dec!(7.5),
                base_salary: dec!(2400),
            },
            appointments: vec![appointment(2024, 3)],
            invoices: vec![invoice(2024, 3, dec!(1600))],
        },
        DoctorLedger {
            profile: DoctorProfile {
                doctor_id: "doc-003".to_string(),
                name: "Dr. Minji Cho".to_string(),
                specialization: "Cardiology".to_string(),
                sales_percentage: dec!(12),
                base_salary: dec!(3000),
            },
            appointments: vec![],
            invoices: vec![],
        },
    ]
}

fn export_statement(report: &PayoutReport, filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)?;

    writer.write_record([
        "doctor_id",
        "doctor_name",
        "specialization",
        "appointments",
        "invoices",
        "revenue",
        "rate_pct",
        "base_salary",
        "incentive",
        "total_payout",
    ])?;

    for doctor in &report.doctors {
        writer.write_record([
            doctor.doctor_id.as_str(),
            doctor.doctor_name.as_str(),
            doctor.specialization.as_str(),
            &doctor.appointment_count.to_string(),
            &doctor.invoice_count.to_string(),
            &doctor.revenue_generated.to_string(),
            &doctor.sales_percentage.to_string(),
            &doctor.base_salary.to_string(),
            &doctor.sales_incentive.to_string(),
            &doctor.total_payout.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    println!("💰 Doctor Payout Statement Demo\n");

    let report = doctor_payouts(2024, 3, &roster())?;

    println!("Payout statement for {}-{:02}:\n", report.year, report.month);
    for doctor in &report.doctors {
        println!("{} ({})", doctor.doctor_name, doctor.specialization);
        println!(
            "  {} appointments, {} invoices, revenue {}",
            doctor.appointment_count, doctor.invoice_count, doctor.revenue_generated
        );
        println!("  Incentive: {}", doctor.incentive_calculation);
        println!(
            "  Base {} + incentive {} = {}\n",
            doctor.base_salary, doctor.sales_incentive, doctor.total_payout
        );
    }

    println!("Fleet totals:");
    println!("  Doctors:         {}", report.totals.total_doctors);
    println!("  Revenue:         {}", report.totals.total_revenue);
    println!("  Sales incentive: {}", report.totals.total_sales_incentive);
    println!("  Total payout:    {}", report.totals.total_payout);
    println!("  Reconciles:      {}", report.reconciles());

    let filename = "payout_statement_2024_03.csv";
    export_statement(&report, filename)?;
    println!("\n📄 Statement exported to {}", filename);

    Ok(())
}
