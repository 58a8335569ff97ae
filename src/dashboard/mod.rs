//! The aggregated dashboard overview.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod overview_endpoint;

pub use core::{CategorySummary, FinancialSummary, category_summary, financial_summary};
pub use overview_endpoint::{OverviewParams, dashboard_overview_endpoint};

/// The state needed by the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for the summary queries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
