//! Defines the data model and database queries for per-user settings.

use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, user::UserId};

/// The currency assumed for a user who has never saved their settings.
const DEFAULT_CURRENCY: &str = "USD";

/// A user's display preferences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSettings {
    /// The ID of the user the settings belong to.
    pub user_id: UserId,
    /// The currency code amounts are displayed in, e.g. 'USD'.
    pub currency: String,
}

/// Create the user settings table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_user_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_settings (
                user_id INTEGER PRIMARY KEY,
                currency TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Get the settings for `user_id`, creating a default row on first access.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_or_create_settings(
    user_id: UserId,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    connection.execute(
        "INSERT OR IGNORE INTO user_settings (user_id, currency) VALUES (:user_id, :currency)",
        rusqlite::named_params! {
            ":user_id": user_id.as_i64(),
            ":currency": DEFAULT_CURRENCY,
        },
    )?;

    let currency = connection.query_row(
        "SELECT currency FROM user_settings WHERE user_id = :user_id",
        &[(":user_id", &user_id.as_i64())],
        |row| row.get(0),
    )?;

    Ok(UserSettings { user_id, currency })
}

/// Set the currency for `user_id`, creating the settings row if needed.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn update_settings(
    user_id: UserId,
    currency: &str,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    connection.execute(
        "INSERT INTO user_settings (user_id, currency) VALUES (:user_id, :currency)
         ON CONFLICT(user_id) DO UPDATE SET currency = excluded.currency",
        rusqlite::named_params! {
            ":user_id": user_id.as_i64(),
            ":currency": currency,
        },
    )?;

    Ok(UserSettings {
        user_id,
        currency: currency.to_owned(),
    })
}

#[cfg(test)]
mod settings_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        user::{UserId, create_user},
    };

    use super::{get_or_create_settings, update_settings};

    fn get_test_connection() -> (Connection, UserId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("foo@bar.baz", &conn).unwrap();

        (conn, user.id)
    }

    #[test]
    fn first_access_creates_default_settings() {
        let (conn, user_id) = get_test_connection();

        let settings = get_or_create_settings(user_id, &conn).unwrap();

        assert_eq!(settings.currency, "USD");
    }

    #[test]
    fn update_persists_across_reads() {
        let (conn, user_id) = get_test_connection();

        update_settings(user_id, "EUR", &conn).unwrap();
        let settings = get_or_create_settings(user_id, &conn).unwrap();

        assert_eq!(settings.currency, "EUR");
    }
}
