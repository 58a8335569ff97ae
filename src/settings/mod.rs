//! Per-user settings and the endpoints for reading and updating them.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod endpoints;

pub use core::{UserSettings, create_user_settings_table, get_or_create_settings, update_settings};
pub use endpoints::{SettingsForm, get_settings_endpoint, update_settings_endpoint};

/// The state needed by the settings endpoints.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// The database connection for reading and writing settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
