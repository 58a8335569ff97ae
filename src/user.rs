//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors, and more flexible generics that can have
/// distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// All domain entities are owned by exactly one user; every query and
/// mutation is scoped by the owning user's ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's email address.
    pub email: String,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email address is already
/// registered, or [Error::SqlError] if an SQL related error occurred.
pub fn create_user(email: &str, connection: &Connection) -> Result<User, Error> {
    connection.execute("INSERT INTO user (email) VALUES (?1)", (email,))?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email: email.to_owned(),
    })
}

/// Get the user from the database with an email equal to `email`.
///
/// # Errors
///
/// This function will return an error if:
/// - `email` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email FROM user WHERE email = :email")?
        .query_row(&[(":email", &email)], |row| {
            Ok(User {
                id: UserId::new(row.get(0)?),
                email: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use super::{Error, create_user, create_user_table, get_user_by_email};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let conn = get_db_connection();

        let inserted_user = create_user("foo@bar.baz", &conn).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email, "foo@bar.baz");
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let conn = get_db_connection();
        create_user("foo@bar.baz", &conn).unwrap();

        let duplicate = create_user("foo@bar.baz", &conn);

        assert_eq!(duplicate, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_unregistered_email() {
        let conn = get_db_connection();

        assert_eq!(
            get_user_by_email("nobody@bar.baz", &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_user_by_email_succeeds() {
        let conn = get_db_connection();
        let test_user = create_user("foo@bar.baz", &conn).unwrap();

        let retrieved_user = get_user_by_email("foo@bar.baz", &conn).unwrap();

        assert_eq!(retrieved_user, test_user);
    }
}
