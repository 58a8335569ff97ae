//! Defines the endpoint for listing a user's transactions.

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde_json::json;

use crate::{
    Error,
    pagination::{PaginationParams, page_count},
    response::data_response,
    user::UserId,
};

use super::{
    TransactionState,
    core::{count_transactions, list_transactions},
};

/// A route handler for listing a user's transactions, newest first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();

    let transactions = list_transactions(user_id, params.limit(), params.offset(), &connection)?;
    let total_count = count_transactions(user_id, &connection)?;

    Ok(data_response(
        StatusCode::OK,
        "Transactions retrieved successfully",
        json!({
            "transactions": transactions,
            "total_count": total_count,
            "total_pages": page_count(total_count, params.limit()),
            "current_page": params.page(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json,
        extract::{Query, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::{NewCategory, create_category},
        db::initialize,
        pagination::PaginationParams,
        transaction::{TransactionForm, TransactionType, create_transaction_endpoint},
        user::{UserId, create_user},
    };

    use super::{TransactionState, list_transactions_endpoint};

    async fn get_fixture(transaction_count: usize) -> (TransactionState, UserId) {
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

        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        for _ in 0..transaction_count {
            create_transaction_endpoint(
                State(state.clone()),
                Extension(user.id),
                Json(TransactionForm {
                    name: "Groceries".to_owned(),
                    amount: 10.0,
                    description: None,
                    date: date!(2024 - 03 - 15),
                    transaction_type: TransactionType::Expense,
                    category: category.id,
                    budget: None,
                }),
            )
            .await
            .unwrap();
        }

        (state, user.id)
    }

    #[tokio::test]
    async fn list_returns_page_metadata() {
        let (state, user_id) = get_fixture(15).await;

        let response = list_transactions_endpoint(
            State(state),
            Extension(user_id),
            Query(PaginationParams {
                page: Some(2),
                limit: Some(10),
            }),
        )
        .await
        .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let data = &json["data"];

        assert_eq!(data["total_count"], 15);
        assert_eq!(data["total_pages"], 2);
        assert_eq!(data["current_page"], 2);
        assert_eq!(data["transactions"].as_array().unwrap().len(), 5);
    }
}
