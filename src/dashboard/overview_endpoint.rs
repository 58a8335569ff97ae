//! Defines the endpoint that aggregates everything shown on the dashboard.

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    history::{HistorySeries, TimeFrame, history_periods, monthly_history, yearly_history},
    response::{FieldError, data_response},
    user::UserId,
};

use super::{
    DashboardState,
    core::{category_summary, financial_summary},
};

/// Query parameters for the dashboard overview endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OverviewParams {
    /// The first day to include in the summaries.
    pub from: Option<Date>,
    /// The last day to include in the summaries.
    pub to: Option<Date>,
    /// The granularity of the history series. Defaults to a daily series for
    /// one month.
    pub time_frame: Option<TimeFrame>,
    /// The year the history series covers. Defaults to the current year.
    pub year: Option<i32>,
    /// The month the history series covers. Defaults to the current month
    /// and is ignored for yearly series.
    pub month: Option<u8>,
}

/// A route handler returning the financial summary, per-category totals,
/// history series and active years in one response.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn dashboard_overview_endpoint(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<OverviewParams>,
) -> Result<Response, Error> {
    let now = OffsetDateTime::now_utc();
    let year = params.year.unwrap_or_else(|| now.year());
    let month = params.month.unwrap_or_else(|| u8::from(now.month()));
    if !(1..=12).contains(&month) {
        return Err(Error::Validation(vec![FieldError::new(
            "month",
            "Month must be between 1 and 12",
        )]));
    }

    let connection = state.db_connection.lock().unwrap();

    let financial_summary = financial_summary(user_id, params.from, params.to, &connection)?;
    let category_summary = category_summary(user_id, params.from, params.to, &connection)?;

    let history = match params.time_frame.unwrap_or(TimeFrame::Month) {
        TimeFrame::Month => {
            HistorySeries::Daily(monthly_history(user_id, year, month, &connection)?)
        }
        TimeFrame::Year => HistorySeries::Monthly(yearly_history(user_id, year, &connection)?),
    };
    let history_periods = history_periods(user_id, &connection)?;

    Ok(data_response(
        StatusCode::OK,
        "Overview retrieved successfully",
        json!({
            "financial_summary": financial_summary,
            "category_summary": category_summary,
            "history": history,
            "history_periods": history_periods,
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
        history::TimeFrame,
        transaction::{
            TransactionForm, TransactionState, TransactionType, create_transaction_endpoint,
        },
        user::{UserId, create_user},
    };

    use super::{DashboardState, OverviewParams, dashboard_overview_endpoint};

    async fn get_fixture() -> (DashboardState, UserId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("foo@bar.baz", &conn).unwrap();
        let income = create_category(
            &NewCategory {
                name: "Salary".to_owned(),
                icon: "💰".to_owned(),
                category_type: TransactionType::Income,
            },
            user.id,
            &conn,
        )
        .unwrap();
        let expense = create_category(
            &NewCategory {
                name: "Groceries".to_owned(),
                icon: "🛒".to_owned(),
                category_type: TransactionType::Expense,
            },
            user.id,
            &conn,
        )
        .unwrap();

        let db_connection = Arc::new(Mutex::new(conn));
        let transaction_state = TransactionState {
            db_connection: db_connection.clone(),
        };

        for (category, amount, transaction_type) in [
            (income.id, 1000.0, TransactionType::Income),
            (expense.id, 250.0, TransactionType::Expense),
        ] {
            create_transaction_endpoint(
                State(transaction_state.clone()),
                Extension(user.id),
                Json(TransactionForm {
                    name: "Test".to_owned(),
                    amount,
                    description: None,
                    date: date!(2024 - 03 - 15),
                    transaction_type,
                    category,
                    budget: None,
                }),
            )
            .await
            .unwrap();
        }

        (DashboardState { db_connection }, user.id)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn overview_combines_all_sections() {
        let (state, user_id) = get_fixture().await;

        let response = dashboard_overview_endpoint(
            State(state),
            Extension(user_id),
            Query(OverviewParams {
                time_frame: Some(TimeFrame::Month),
                year: Some(2024),
                month: Some(3),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let json = body_json(response).await;
        let data = &json["data"];
        assert_eq!(data["financial_summary"]["total_balance"], 750.0);
        assert_eq!(data["category_summary"].as_array().unwrap().len(), 2);
        assert_eq!(data["history"].as_array().unwrap().len(), 31);
        assert_eq!(data["history_periods"], serde_json::json!([2024]));
    }

    #[tokio::test]
    async fn yearly_series_has_twelve_points() {
        let (state, user_id) = get_fixture().await;

        let response = dashboard_overview_endpoint(
            State(state),
            Extension(user_id),
            Query(OverviewParams {
                time_frame: Some(TimeFrame::Year),
                year: Some(2024),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["history"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn empty_period_returns_empty_series() {
        let (state, user_id) = get_fixture().await;

        let response = dashboard_overview_endpoint(
            State(state),
            Extension(user_id),
            Query(OverviewParams {
                time_frame: Some(TimeFrame::Month),
                year: Some(2031),
                month: Some(1),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["history"], serde_json::json!([]));
    }
}
