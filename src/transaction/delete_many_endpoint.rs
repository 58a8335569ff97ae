//! Defines the endpoint for deleting a batch of transactions at once.

use std::collections::{BTreeMap, BTreeSet};

use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;
use serde_json::json;
use time::Date;

use crate::{
    Error,
    budget::apply_budget_delta,
    database_id::{BudgetId, TransactionId},
    history::remove_from_history,
    response::{FieldError, data_response},
    user::UserId,
};

use super::{
    TransactionState,
    core::{TransactionType, delete_transactions, get_transactions_by_ids},
};

/// The request body for deleting a batch of transactions.
#[derive(Debug, Deserialize)]
pub struct DeleteManyForm {
    /// The ids of the transactions to delete.
    pub list_id: Vec<TransactionId>,
}

/// A route handler for deleting a batch of transactions.
///
/// All-or-nothing: if any id does not refer to a transaction owned by the
/// caller, nothing is deleted. The reversals are batched, with one history
/// update per affected day and one budget update per affected budget.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn delete_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    Json(form): Json<DeleteManyForm>,
) -> Result<Response, Error> {
    let ids: Vec<TransactionId> = form
        .list_id
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if ids.is_empty() {
        return Err(Error::Validation(vec![FieldError::new(
            "list_id",
            "Please select at least one transaction",
        )]));
    }

    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    let transactions = get_transactions_by_ids(&ids, user_id, &tx)?;
    if transactions.len() != ids.len() {
        return Err(Error::NotFound);
    }

    // (income, expense) per day and total expense per budget.
    let mut history_deltas: BTreeMap<Date, (f64, f64)> = BTreeMap::new();
    let mut budget_deltas: BTreeMap<BudgetId, f64> = BTreeMap::new();

    for transaction in &transactions {
        let day_totals = history_deltas.entry(transaction.date).or_insert((0.0, 0.0));
        match transaction.transaction_type {
            TransactionType::Income => day_totals.0 += transaction.amount,
            TransactionType::Expense => {
                day_totals.1 += transaction.amount;

                if let Some(budget_id) = transaction.budget_id {
                    *budget_deltas.entry(budget_id).or_insert(0.0) += transaction.amount;
                }
            }
        }
    }

    let deleted_count = delete_transactions(&ids, user_id, &tx)?;

    for (date, (income_delta, expense_delta)) in history_deltas {
        remove_from_history(user_id, date, income_delta, expense_delta, &tx)?;
    }

    for (budget_id, total) in budget_deltas {
        apply_budget_delta(budget_id, user_id, -total, &tx)?;
    }

    tx.commit()?;

    Ok(data_response(
        StatusCode::OK,
        "Transactions deleted successfully",
        json!({ "deleted_count": deleted_count }),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        budget::{NewBudget, create_budget, get_budget},
        category::{NewCategory, create_category},
        database_id::{BudgetId, CategoryId, TransactionId},
        db::initialize,
        transaction::{TransactionForm, TransactionType, create_transaction_endpoint},
        user::{UserId, create_user},
    };

    use super::{DeleteManyForm, TransactionState, delete_transactions_endpoint};

    struct Fixture {
        state: TransactionState,
        user_id: UserId,
        category_id: CategoryId,
        budget_id: BudgetId,
    }

    fn get_fixture() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("foo@bar.baz", &conn).unwrap();
        let category = create_category(
            &NewCategory {
                name: "Groceries".to_owned(),
                icon: "🛒".to_owned(),
                category_type: TransactionType::Expense,
            },
            user.id,
            &conn,
        )
        .unwrap();
        let budget = create_budget(
            &NewBudget {
                name: "Food".to_owned(),
                amount: 500.0,
                category_id: category.id,
                start_date: None,
                end_date: None,
            },
            user.id,
            &conn,
        )
        .unwrap();

        Fixture {
            state: TransactionState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            user_id: user.id,
            category_id: category.id,
            budget_id: budget.id,
        }
    }

    async fn add_expense(fixture: &Fixture, amount: f64) -> TransactionId {
        create_transaction_endpoint(
            State(fixture.state.clone()),
            Extension(fixture.user_id),
            Json(TransactionForm {
                name: "Groceries".to_owned(),
                amount,
                description: None,
                date: date!(2024 - 03 - 15),
                transaction_type: TransactionType::Expense,
                category: fixture.category_id,
                budget: Some(fixture.budget_id),
            }),
        )
        .await
        .unwrap();

        let conn = fixture.state.db_connection.lock().unwrap();
        conn.query_row("SELECT MAX(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn bulk_delete_reverses_budget_and_history() {
        let fixture = get_fixture();
        let first = add_expense(&fixture, 50.0).await;
        let second = add_expense(&fixture, 75.0).await;

        delete_transactions_endpoint(
            State(fixture.state.clone()),
            Extension(fixture.user_id),
            Json(DeleteManyForm {
                list_id: vec![first, second],
            }),
        )
        .await
        .unwrap();

        let conn = fixture.state.db_connection.lock().unwrap();
        let budget = get_budget(fixture.budget_id, fixture.user_id, &conn).unwrap();
        assert_eq!(budget.total_spent, 0.0);
        assert_eq!(budget.remaining, 500.0);

        let history_rows: i64 = conn
            .query_row("SELECT COUNT(id) FROM history", [], |row| row.get(0))
            .unwrap();
        assert_eq!(history_rows, 0);

        let remaining_transactions: i64 = conn
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining_transactions, 0);
    }

    #[tokio::test]
    async fn one_foreign_id_rejects_whole_batch() {
        let fixture = get_fixture();
        let mine = add_expense(&fixture, 50.0).await;

        let result = delete_transactions_endpoint(
            State(fixture.state.clone()),
            Extension(fixture.user_id),
            Json(DeleteManyForm {
                list_id: vec![mine, 1337],
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound)));
        let conn = fixture.state.db_connection.lock().unwrap();
        let remaining: i64 = conn
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let fixture = get_fixture();

        let result = delete_transactions_endpoint(
            State(fixture.state),
            Extension(fixture.user_id),
            Json(DeleteManyForm { list_id: vec![] }),
        )
        .await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
