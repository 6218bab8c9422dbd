//! Employee records and the remaining-salary computation for the current
//! pay period.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::Salary;

/// Employee directory record with the recurring pay-period bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_salary: Option<f64>,
    /// Day of month the pay period opens, 1..=31.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_period_start: Option<u32>,
    /// Day of month the pay period closes. A day before the start day
    /// means the period runs into the next month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_period_end: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_last_updated: Option<NaiveDate>,
}

impl Employee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            basic_salary: None,
            salary_period_start: None,
            salary_period_end: None,
            salary_last_updated: None,
        }
    }

    pub fn with_salary(mut self, basic_salary: f64, period_start: u32, period_end: u32) -> Self {
        self.basic_salary = Some(basic_salary);
        self.salary_period_start = Some(period_start);
        self.salary_period_end = Some(period_end);
        self
    }
}

/// Resolves the pay-period window anchored on the current month.
///
/// The window opens on `start_day` of `today`'s month and closes on
/// `end_day` of the same month, or of the next month when `end_day` is
/// before `start_day`. Days are clamped to the month length, so a period
/// closing on the 31st closes on the 28th or 29th in February.
pub fn period_window(start_day: u32, end_day: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = clamp_to_month(today.year(), today.month(), start_day);
    let end = if end_day < start_day {
        let (year, month) = next_month(today.year(), today.month());
        clamp_to_month(year, month, end_day)
    } else {
        clamp_to_month(today.year(), today.month(), end_day)
    };
    (start, end)
}

/// Unpaid salary for the employee's current pay period.
///
/// An employee without a basic salary has nothing outstanding; one without
/// period bounds owes the whole basic salary. Payments beyond the basic
/// salary clamp the result at zero.
pub fn remaining_salary(employee: &Employee, history: &[Salary], today: NaiveDate) -> f64 {
    let Some(basic) = employee.basic_salary else {
        return 0.0;
    };
    let (Some(start_day), Some(end_day)) =
        (employee.salary_period_start, employee.salary_period_end)
    else {
        return basic;
    };

    let (start, end) = period_window(start_day, end_day, today);
    let paid: f64 = history
        .iter()
        .filter(|salary| salary.employee_name == employee.name)
        .filter(|salary| start <= salary.date && salary.date <= end)
        .map(|salary| salary.amount)
        .sum();
    (basic - paid).max(0.0)
}

fn clamp_to_month(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}
