//! Defines the core data model and database queries for budgets.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    database_id::{BudgetId, CategoryId, DatabaseId},
    user::UserId,
};

/// A spending cap for one expense category.
///
/// `total_spent` and `remaining` are derived from the expenses attached to
/// the budget and are kept in sync by the transaction endpoints; they are
/// never written directly by clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseId,
    /// A short name for the budget.
    pub name: String,
    /// The total amount of money allocated to the budget.
    pub amount: f64,
    /// The sum of the expenses attached to the budget.
    pub total_spent: f64,
    /// The amount left to spend, i.e. `amount - total_spent`.
    pub remaining: f64,
    /// The ID of the expense category the budget covers.
    pub category_id: CategoryId,
    /// The first day the budget applies to, if bounded.
    pub start_date: Option<Date>,
    /// The last day the budget applies to, if bounded.
    pub end_date: Option<Date>,
    /// The ID of the user who owns the budget.
    pub user_id: UserId,
}

/// The field values for creating or updating a budget, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// A short name for the budget.
    pub name: String,
    /// The total amount of money allocated to the budget.
    pub amount: f64,
    /// The ID of the expense category the budget covers.
    pub category_id: CategoryId,
    /// The first day the budget applies to, if bounded.
    pub start_date: Option<Date>,
    /// The last day the budget applies to, if bounded.
    pub end_date: Option<Date>,
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                total_spent REAL NOT NULL DEFAULT 0,
                remaining REAL NOT NULL,
                category_id INTEGER NOT NULL,
                start_date TEXT,
                end_date TEXT,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        total_spent: row.get(3)?,
        remaining: row.get(4)?,
        category_id: row.get(5)?,
        start_date: row.get(6)?,
        end_date: row.get(7)?,
        user_id: UserId::new(row.get(8)?),
    })
}

const BUDGET_COLUMNS: &str =
    "id, name, amount, total_spent, remaining, category_id, start_date, end_date, user_id";

/// Create a new budget in the database. The budget starts with nothing spent,
/// so `remaining` equals the allocated amount.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_budget(
    new_budget: &NewBudget,
    user_id: UserId,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!(
            "INSERT INTO budget
                (name, amount, total_spent, remaining, category_id, start_date, end_date, user_id)
             VALUES (?1, ?2, 0, ?2, ?3, ?4, ?5, ?6)
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                &new_budget.name,
                new_budget.amount,
                new_budget.category_id,
                new_budget.start_date,
                new_budget.end_date,
                user_id.as_i64(),
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve a budget owned by `user_id` by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_budget(
    id: BudgetId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budget WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(&[(":id", &id), (":user_id", &user_id.as_i64())], map_budget_row)?;

    Ok(budget)
}

/// Check whether `user_id` already has a budget called `name`, ignoring the
/// budget `exclude_id` so updates do not collide with themselves.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn budget_name_exists(
    name: &str,
    exclude_id: Option<BudgetId>,
    user_id: UserId,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM budget
         WHERE name = :name AND user_id = :user_id AND id != :exclude_id",
        rusqlite::named_params! {
            ":name": name,
            ":user_id": user_id.as_i64(),
            ":exclude_id": exclude_id.unwrap_or(-1),
        },
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Persist new field values for the budget `id` owned by `user_id`.
///
/// `remaining` is recomputed as the new amount minus what has already been
/// spent, so changing the allocation moves the headroom rather than the
/// spend.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    user_id: UserId,
    new_budget: &NewBudget,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE budget
         SET name = ?1, amount = ?2, remaining = ?2 - total_spent, category_id = ?3,
             start_date = ?4, end_date = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            &new_budget.name,
            new_budget.amount,
            new_budget.category_id,
            new_budget.start_date,
            new_budget.end_date,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the budget `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_budget(id: BudgetId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Apply a spend delta to the budget `id` owned by `user_id`.
///
/// A positive `delta` records money spent against the budget and a negative
/// `delta` reverses it. Every code path that moves an expense on or off a
/// budget goes through this function so `total_spent + remaining` always
/// equals `amount`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn apply_budget_delta(
    id: BudgetId,
    user_id: UserId,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE budget
         SET total_spent = total_spent + :delta, remaining = remaining - :delta
         WHERE id = :id AND user_id = :user_id",
        rusqlite::named_params! {
            ":delta": delta,
            ":id": id,
            ":user_id": user_id.as_i64(),
        },
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Retrieve one page of budgets owned by `user_id`, optionally filtered by a
/// name keyword and a category.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_budgets(
    user_id: UserId,
    keyword: Option<&str>,
    category_id: Option<CategoryId>,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    let keyword_pattern = keyword.map(|keyword| format!("%{keyword}%"));

    connection
        .prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budget
             WHERE user_id = :user_id
                AND (:keyword IS NULL OR name LIKE :keyword)
                AND (:category_id IS NULL OR category_id = :category_id)
             ORDER BY id DESC
             LIMIT :limit OFFSET :offset"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":keyword": keyword_pattern,
                ":category_id": category_id,
                ":limit": limit as i64,
                ":offset": offset as i64,
            },
            map_budget_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Count the budgets owned by `user_id` that match the same filters as
/// [list_budgets].
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_budgets(
    user_id: UserId,
    keyword: Option<&str>,
    category_id: Option<CategoryId>,
    connection: &Connection,
) -> Result<u64, Error> {
    let keyword_pattern = keyword.map(|keyword| format!("%{keyword}%"));

    connection
        .query_row(
            "SELECT COUNT(id) FROM budget
             WHERE user_id = :user_id
                AND (:keyword IS NULL OR name LIKE :keyword)
                AND (:category_id IS NULL OR category_id = :category_id)",
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":keyword": keyword_pattern,
                ":category_id": category_id,
            },
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}
