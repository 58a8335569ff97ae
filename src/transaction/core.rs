//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::{BudgetId, CategoryId, DatabaseId, TransactionId},
    user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction records money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money earned.
    #[serde(rename = "INCOME")]
    Income,
    /// Money spent.
    #[serde(rename = "EXPENSE")]
    Expense,
}

impl TransactionType {
    /// The string stored in the database for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// A short name for the transaction.
    pub name: String,
    /// The amount of money earned or spent, always positive.
    pub amount: f64,
    /// An optional longer description of the transaction.
    pub description: Option<String>,
    /// The day the transaction happened. Time of day is not recorded; this
    /// date is the granularity key for the history aggregates.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The ID of the budget the expense counts against, if any. Always `None`
    /// for income transactions.
    pub budget_id: Option<BudgetId>,
    /// The ID of the user who owns the transaction.
    pub user_id: UserId,
    /// When the transaction row was created.
    pub created_at: OffsetDateTime,
    /// When the transaction row was last modified.
    pub updated_at: OffsetDateTime,
}

/// The field values for creating or updating a transaction, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short name for the transaction.
    pub name: String,
    /// The amount of money earned or spent, always positive.
    pub amount: f64,
    /// An optional longer description of the transaction.
    pub description: Option<String>,
    /// The day the transaction happened.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The ID of the budget the expense counts against, if any.
    pub budget_id: Option<BudgetId>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK(type IN ('INCOME', 'EXPENSE')),
                category_id INTEGER NOT NULL,
                budget_id INTEGER,
                user_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id),
                FOREIGN KEY(budget_id) REFERENCES budget(id) ON DELETE SET NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Composite index used by the listing and summary queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date
         ON \"transaction\"(user_id, date)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        transaction_type: row.get(5)?,
        category_id: row.get(6)?,
        budget_id: row.get(7)?,
        user_id: UserId::new(row.get(8)?),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const TRANSACTION_COLUMNS: &str =
    "id, name, amount, description, date, type, category_id, budget_id, user_id, \
     created_at, updated_at";

/// Create a new transaction in the database.
///
/// The caller is responsible for validating `new_transaction` and for
/// checking the referenced category and budget belong to `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: &NewTransaction,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (name, amount, description, date, type, category_id, budget_id, user_id,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                &new_transaction.name,
                new_transaction.amount,
                &new_transaction.description,
                new_transaction.date,
                new_transaction.transaction_type,
                new_transaction.category_id,
                new_transaction.budget_id,
                user_id.as_i64(),
                now,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id` by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Persist new field values for the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserId,
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET name = ?1, amount = ?2, description = ?3, date = ?4, type = ?5,
             category_id = ?6, budget_id = ?7, updated_at = ?8
         WHERE id = ?9 AND user_id = ?10",
        (
            &new_transaction.name,
            new_transaction.amount,
            &new_transaction.description,
            new_transaction.date,
            new_transaction.transaction_type,
            new_transaction.category_id,
            new_transaction.budget_id,
            OffsetDateTime::now_utc(),
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the transaction `id` owned by `user_id`, returning the number of
/// rows deleted (zero or one).
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )
        .map_err(|error| error.into())
}

/// Retrieve the transactions owned by `user_id` whose ids are in `ids`.
///
/// Ids that do not exist or belong to another user are silently absent from
/// the result; callers that need all-or-nothing semantics should compare the
/// result length against the number of distinct requested ids.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_ids(
    ids: &[TransactionId],
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
         WHERE user_id = ? AND id IN ({placeholders})"
    );

    let user_id = user_id.as_i64();
    let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&user_id];
    for id in ids {
        params.push(id);
    }

    connection
        .prepare(&sql)?
        .query_map(params.as_slice(), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete all transactions owned by `user_id` whose ids are in `ids`,
/// returning the number of rows deleted.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transactions(
    ids: &[TransactionId],
    user_id: UserId,
    connection: &Connection,
) -> Result<usize, Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "DELETE FROM \"transaction\" WHERE user_id = ? AND id IN ({placeholders})"
    );

    let user_id = user_id.as_i64();
    let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&user_id];
    for id in ids {
        params.push(id);
    }

    connection
        .execute(&sql, params.as_slice())
        .map_err(|error| error.into())
}

/// Retrieve one page of transactions owned by `user_id`, newest first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    user_id: UserId,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC
             LIMIT :limit OFFSET :offset"
        ))?
        .query_map(
            &[
                (":user_id", &user_id.as_i64()),
                (":limit", &(limit as i64)),
                (":offset", &(offset as i64)),
            ],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of transactions owned by `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_transactions(user_id: UserId, connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = :user_id",
            &[(":user_id", &user_id.as_i64())],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Get the number of transactions owned by `user_id` that reference the
/// category `category_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_transactions_for_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\"
             WHERE category_id = :category_id AND user_id = :user_id",
            &[(":category_id", &category_id), (":user_id", &user_id.as_i64())],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Detach all of `user_id`'s transactions from the budget `budget_id` by
/// setting their budget to `NULL`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn detach_transactions_from_budget(
    budget_id: BudgetId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE \"transaction\" SET budget_id = NULL
         WHERE budget_id = :budget_id AND user_id = :user_id",
        &[(":budget_id", &budget_id), (":user_id", &user_id.as_i64())],
    )?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
