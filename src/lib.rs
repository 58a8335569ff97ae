//! Budget Tracker is a web service for recording income and expense
//! transactions, grouping them into categories, capping spending with budgets
//! and viewing aggregated history and summaries.
//!
//! This library provides a JSON REST API. The interesting part is the
//! reconciliation logic that keeps the denormalized aggregates consistent as
//! transactions are created, edited and deleted: per-budget spend counters
//! and per-day history buckets move in the same database transaction as the
//! row they describe.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
pub mod endpoints;
mod history;
mod pagination;
mod response;
mod routing;
mod settings;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use response::FieldError;
pub use routing::build_router;
pub use user::{User, UserId};

use crate::response::error_response;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body failed validation. Each entry names the offending
    /// field and a human readable message.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// The requested resource was not found.
    ///
    /// This error is also returned when a resource exists but belongs to a
    /// different user, so that the response does not leak whether the
    /// resource exists at all.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user already has a budget with this name.
    #[error("the budget \"{0}\" already exists")]
    DuplicateBudgetName(String),

    /// The user already has a category with this name and type.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// Tried to delete a category that is still referenced by transactions.
    #[error("the category is still referenced by one or more transactions")]
    CategoryInUse,

    /// The email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation Error",
                Some(&errors),
            ),
            Error::NotFound => error_response(
                StatusCode::NOT_FOUND,
                "The requested resource could not be found",
                None,
            ),
            Error::DuplicateBudgetName(name) => error_response(
                StatusCode::CONFLICT,
                &format!("The budget \"{name}\" already exists"),
                None,
            ),
            Error::DuplicateCategoryName(name) => error_response(
                StatusCode::CONFLICT,
                &format!("The category \"{name}\" already exists"),
                None,
            ),
            Error::CategoryInUse => error_response(
                StatusCode::CONFLICT,
                "The category is still used by one or more transactions",
                None,
            ),
            Error::DuplicateEmail => error_response(
                StatusCode::CONFLICT,
                "The email address is already registered",
                None,
            ),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        }
    }
}
