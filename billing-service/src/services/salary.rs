//! Driver salary calculation: monthly attendance units times the daily wage,
//! minus the driver-charged expense total, never below zero.

use chrono::NaiveDate;

use service_core::error::AppError;

use crate::models::{round2, AttendanceStatus, Driver, DriverAttendance};
use crate::services::BillingStore;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttendanceSummary {
    pub present_days: u32,
    pub half_days: u32,
    pub absent_days: u32,
}

impl AttendanceSummary {
    /// present + 0.5 x half; absences contribute nothing.
    pub fn units(&self) -> f64 {
        self.present_days as f64 + 0.5 * self.half_days as f64
    }
}

pub fn tally_attendance(records: &[DriverAttendance]) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    for record in records {
        match record.status {
            AttendanceStatus::Present => summary.present_days += 1,
            AttendanceStatus::Half => summary.half_days += 1,
            AttendanceStatus::Absent => summary.absent_days += 1,
        }
    }
    summary
}

#[derive(Debug)]
pub struct SalaryBreakdown {
    pub attendance: AttendanceSummary,
    pub daily_wage: f64,
    pub gross_pay: f64,
    pub driver_expenses: f64,
    pub net_pay: f64,
}

pub fn compute_salary(
    attendance: AttendanceSummary,
    daily_wage: f64,
    driver_expenses: f64,
) -> SalaryBreakdown {
    let gross_pay = round2(attendance.units() * daily_wage);
    let driver_expenses = round2(driver_expenses);
    let net_pay = round2((gross_pay - driver_expenses).max(0.0));
    SalaryBreakdown {
        attendance,
        daily_wage,
        gross_pay,
        driver_expenses,
        net_pay,
    }
}

/// Parse `YYYY-MM` into the first and last day of that month.
pub fn parse_month(month: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let bad = || AppError::BadRequest(anyhow::anyhow!("month must be YYYY-MM"));

    let (year_str, month_str) = month.split_once('-').ok_or_else(bad)?;
    let year: i32 = year_str.parse().map_err(|_| bad())?;
    let month_num: u32 = month_str.parse().map_err(|_| bad())?;

    let start = NaiveDate::from_ymd_opt(year, month_num, 1).ok_or_else(bad)?;
    let end = if month_num == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month_num + 1, 1)
    }
    .ok_or_else(bad)?
    .pred_opt()
    .ok_or_else(bad)?;

    Ok((start, end))
}

pub async fn calculate_salary(
    repo: &impl BillingStore,
    vendor_id: &str,
    driver_id: &str,
    month: &str,
) -> Result<(Driver, SalaryBreakdown), AppError> {
    let (month_start, month_end) = parse_month(month)?;

    let driver = repo
        .get_driver(vendor_id, driver_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Driver not found")))?;

    let attendance_records = repo
        .find_attendance_for_month(vendor_id, driver_id, month_start, month_end)
        .await?;
    let attendance = tally_attendance(&attendance_records);

    let expenses = repo
        .find_driver_deductible_expenses(vendor_id, driver_id, month_start, month_end)
        .await?;
    let driver_expenses: f64 = expenses.iter().map(|e| e.amount).sum();

    let breakdown = compute_salary(attendance, driver.daily_wage, driver_expenses);

    tracing::info!(
        driver_id = %driver_id,
        vendor_id = %vendor_id,
        month = %month,
        attendance_units = breakdown.attendance.units(),
        gross_pay = breakdown.gross_pay,
        net_pay = breakdown.net_pay,
        "Salary calculated"
    );

    Ok((driver, breakdown))
}
