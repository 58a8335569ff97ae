//! Budgets and the endpoints for managing them.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod list_endpoint;
mod update_endpoint;

pub use core::{
    Budget, NewBudget, apply_budget_delta, budget_name_exists, count_budgets, create_budget,
    create_budget_table, delete_budget, get_budget, list_budgets, update_budget,
};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;
pub use form::BudgetForm;
pub use list_endpoint::{BudgetListParams, list_budgets_endpoint};
pub use update_endpoint::update_budget_endpoint;

/// The state needed by the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for reading and writing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
