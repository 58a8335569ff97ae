//! Maintains the per-day income and expense aggregates that back the
//! dashboard charts.
//!
//! Every transaction write keeps exactly one row per (day, month, year, user)
//! in sync: creates increment the matching column, deletes decrement it, and
//! a row whose income and expense have both returned to zero is removed
//! entirely.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, user::UserId};

/// The aggregated income and expense for one user on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    /// The day of the month, 1-31.
    pub day: u8,
    /// The month of the year, 1-12.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// The total income recorded on this day.
    pub income: f64,
    /// The total expenses recorded on this day.
    pub expense: f64,
}

/// Which granularity a history series should be aggregated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    /// One data point per day of a month.
    Month,
    /// One data point per month of a year.
    Year,
}

/// One day's totals in a monthly history series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    /// The year the totals belong to.
    pub year: i32,
    /// The month the totals belong to, 1-12.
    pub month: u8,
    /// The day of the month, 1-31.
    pub day: u8,
    /// The total income recorded on this day.
    pub income: f64,
    /// The total expenses recorded on this day.
    pub expense: f64,
}

/// One month's totals in a yearly history series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The year the totals belong to.
    pub year: i32,
    /// The month of the year, 1-12.
    pub month: u8,
    /// The total income recorded in this month.
    pub income: f64,
    /// The total expenses recorded in this month.
    pub expense: f64,
}

/// A zero-filled history series at either granularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HistorySeries {
    /// Totals for every day of one month.
    Daily(Vec<DailyTotals>),
    /// Totals for every month of one year.
    Monthly(Vec<MonthlyTotals>),
}

/// Create the history table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_history_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day INTEGER NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                income REAL NOT NULL DEFAULT 0,
                expense REAL NOT NULL DEFAULT 0,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(day, month, year, user_id)
                )",
        (),
    )?;

    Ok(())
}

/// Add `income_delta` and `expense_delta` to the history row for `date`,
/// creating the row if it does not exist yet.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn add_to_history(
    user_id: UserId,
    date: Date,
    income_delta: f64,
    expense_delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO history (day, month, year, income, expense, user_id)
         VALUES (:day, :month, :year, :income, :expense, :user_id)
         ON CONFLICT(day, month, year, user_id) DO UPDATE SET
             income = income + excluded.income,
             expense = expense + excluded.expense",
        rusqlite::named_params! {
            ":day": date.day(),
            ":month": u8::from(date.month()),
            ":year": date.year(),
            ":income": income_delta,
            ":expense": expense_delta,
            ":user_id": user_id.as_i64(),
        },
    )?;

    Ok(())
}

/// Subtract `income_delta` and `expense_delta` from the history row for
/// `date`.
///
/// Totals never go below zero. If both totals reach zero the row is deleted,
/// so the periods list only ever names years with activity. A missing row is
/// not an error since the transaction being reversed may predate the
/// aggregates.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn remove_from_history(
    user_id: UserId,
    date: Date,
    income_delta: f64,
    expense_delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let day = date.day();
    let month = u8::from(date.month());
    let year = date.year();

    let row: Option<(i64, f64, f64)> = connection
        .query_row(
            "SELECT id, income, expense FROM history
             WHERE day = :day AND month = :month AND year = :year AND user_id = :user_id",
            rusqlite::named_params! {
                ":day": day,
                ":month": month,
                ":year": year,
                ":user_id": user_id.as_i64(),
            },
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .map(Some)
        .or_else(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            error => Err(error),
        })?;

    let Some((id, income, expense)) = row else {
        return Ok(());
    };

    let new_income = income - income_delta;
    let new_expense = expense - expense_delta;

    if new_income <= 0.0 && new_expense <= 0.0 {
        connection.execute("DELETE FROM history WHERE id = :id", &[(":id", &id)])?;
    } else {
        connection.execute(
            "UPDATE history SET income = :income, expense = :expense WHERE id = :id",
            rusqlite::named_params! {
                ":income": new_income.max(0.0),
                ":expense": new_expense.max(0.0),
                ":id": id,
            },
        )?;
    }

    Ok(())
}

/// Get the stored history rows for one month of `user_id`'s activity.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
fn get_month_history(
    user_id: UserId,
    year: i32,
    month: u8,
    connection: &Connection,
) -> Result<Vec<History>, Error> {
    connection
        .prepare(
            "SELECT day, month, year, income, expense FROM history
             WHERE year = :year AND month = :month AND user_id = :user_id
             ORDER BY day ASC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":year": year,
                ":month": month,
                ":user_id": user_id.as_i64(),
            },
            |row| {
                Ok(History {
                    day: row.get(0)?,
                    month: row.get(1)?,
                    year: row.get(2)?,
                    income: row.get(3)?,
                    expense: row.get(4)?,
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Build the daily history series for one month.
///
/// Returns an empty series when the user has no activity in the month at
/// all, otherwise one entry per day of the month with missing days filled
/// with zeroes.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn monthly_history(
    user_id: UserId,
    year: i32,
    month: u8,
    connection: &Connection,
) -> Result<Vec<DailyTotals>, Error> {
    let rows = get_month_history(user_id, year, month, connection)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let month_enum = time::Month::try_from(month).map_err(|_| {
        Error::Validation(vec![crate::response::FieldError::new(
            "month",
            "Month must be between 1 and 12",
        )])
    })?;
    let days_in_month = month_enum.length(year);

    let series = (1..=days_in_month)
        .map(|day| {
            let row = rows.iter().find(|row| row.day == day);

            DailyTotals {
                year,
                month,
                day,
                income: row.map_or(0.0, |row| row.income),
                expense: row.map_or(0.0, |row| row.expense),
            }
        })
        .collect();

    Ok(series)
}

/// Build the monthly history series for one year.
///
/// Returns an empty series when the user has no activity in the year at all,
/// otherwise twelve entries with inactive months filled with zeroes.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn yearly_history(
    user_id: UserId,
    year: i32,
    connection: &Connection,
) -> Result<Vec<MonthlyTotals>, Error> {
    let rows: Vec<(u8, f64, f64)> = connection
        .prepare(
            "SELECT month, SUM(income), SUM(expense) FROM history
             WHERE year = :year AND user_id = :user_id
             GROUP BY month
             ORDER BY month ASC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":year": year,
                ":user_id": user_id.as_i64(),
            },
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?
        .collect::<Result<_, _>>()?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let series = (1..=12)
        .map(|month| {
            let row = rows.iter().find(|(row_month, _, _)| *row_month == month);

            MonthlyTotals {
                year,
                month,
                income: row.map_or(0.0, |(_, income, _)| *income),
                expense: row.map_or(0.0, |(_, _, expense)| *expense),
            }
        })
        .collect();

    Ok(series)
}

/// Get the distinct years in which `user_id` has recorded activity, in
/// ascending order. Defaults to the current year when there is no activity
/// so period pickers always have something to show.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn history_periods(user_id: UserId, connection: &Connection) -> Result<Vec<i32>, Error> {
    let years: Vec<i32> = connection
        .prepare(
            "SELECT DISTINCT year FROM history WHERE user_id = :user_id ORDER BY year ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    if years.is_empty() {
        return Ok(vec![time::OffsetDateTime::now_utc().year()]);
    }

    Ok(years)
}
