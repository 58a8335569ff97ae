//! The summary queries behind the dashboard overview.

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    database_id::CategoryId,
    transaction::TransactionType,
    user::UserId,
};

/// A user's overall income, expenses and balance, optionally limited to a
/// date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    /// The sum of all income transactions.
    pub total_income: f64,
    /// The sum of all expense transactions.
    pub total_expense: f64,
    /// Income minus expenses.
    pub total_balance: f64,
}

/// The total spent or earned in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// The ID of the category.
    pub category_id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// The category's icon.
    pub icon: String,
    /// Whether the totals are income or expenses.
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    /// The summed transaction amounts for the category.
    pub sum: f64,
}

/// Sum a user's transactions into income, expense and balance totals,
/// optionally limited to the inclusive date range `from..=to`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn financial_summary(
    user_id: UserId,
    from: Option<Date>,
    to: Option<Date>,
    connection: &Connection,
) -> Result<FinancialSummary, Error> {
    let totals: Vec<(TransactionType, f64)> = connection
        .prepare(
            "SELECT type, SUM(amount) FROM \"transaction\"
             WHERE user_id = :user_id
                AND (:from IS NULL OR date >= :from)
                AND (:to IS NULL OR date <= :to)
             GROUP BY type",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":from": from,
                ":to": to,
            },
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?
        .collect::<Result<_, _>>()?;

    let mut summary = FinancialSummary {
        total_income: 0.0,
        total_expense: 0.0,
        total_balance: 0.0,
    };
    for (transaction_type, total) in totals {
        match transaction_type {
            TransactionType::Income => summary.total_income = total,
            TransactionType::Expense => summary.total_expense = total,
        }
    }
    summary.total_balance = summary.total_income - summary.total_expense;

    Ok(summary)
}

/// Sum a user's transactions per category, optionally limited to the
/// inclusive date range `from..=to`, largest totals first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn category_summary(
    user_id: UserId,
    from: Option<Date>,
    to: Option<Date>,
    connection: &Connection,
) -> Result<Vec<CategorySummary>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.icon, t.type, SUM(t.amount) AS total
             FROM \"transaction\" t
             JOIN category c ON c.id = t.category_id
             WHERE t.user_id = :user_id
                AND (:from IS NULL OR t.date >= :from)
                AND (:to IS NULL OR t.date <= :to)
             GROUP BY t.type, t.category_id
             ORDER BY total DESC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":from": from,
                ":to": to,
            },
            |row| {
                Ok(CategorySummary {
                    category_id: row.get(0)?,
                    name: row.get(1)?,
                    icon: row.get(2)?,
                    category_type: row.get(3)?,
                    sum: row.get(4)?,
                })
            },
        )?
        .map(|maybe_summary| maybe_summary.map_err(|error| error.into()))
        .collect()
}
