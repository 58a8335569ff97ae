//! Categories and the endpoints for managing them.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod endpoints;
mod form;

pub use core::{
    Category, NewCategory, category_name_exists, create_category, create_category_table,
    delete_category, get_category, list_categories, update_category,
};
pub use endpoints::{
    CategoryListParams, create_category_endpoint, delete_category_endpoint,
    list_categories_endpoint, update_category_endpoint,
};
pub use form::CategoryForm;

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for reading and writing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
