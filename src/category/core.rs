//! Defines the core data model and database queries for categories.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    Error,
    database_id::{CategoryId, DatabaseId},
    transaction::TransactionType,
    user::UserId,
};

/// A label for grouping transactions, e.g. 'Groceries' or 'Salary'.
///
/// A category is either an income category or an expense category; a
/// transaction must use a category of its own type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseId,
    /// The display name of the category.
    pub name: String,
    /// An emoji or short glyph shown next to the name.
    pub icon: String,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    /// The ID of the user who owns the category.
    pub user_id: UserId,
}

/// The field values for creating or updating a category, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The display name of the category.
    pub name: String,
    /// An emoji or short glyph shown next to the name.
    pub icon: String,
    /// Whether the category is for income or expenses.
    pub category_type: TransactionType,
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                icon TEXT NOT NULL,
                type TEXT NOT NULL CHECK(type IN ('INCOME', 'EXPENSE')),
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        category_type: row.get(3)?,
        user_id: UserId::new(row.get(4)?),
    })
}

const CATEGORY_COLUMNS: &str = "id, name, icon, type, user_id";

/// Create a new category in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_category(
    new_category: &NewCategory,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(&format!(
            "INSERT INTO category (name, icon, type, user_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {CATEGORY_COLUMNS}"
        ))?
        .query_row(
            (
                &new_category.name,
                &new_category.icon,
                new_category.category_type,
                user_id.as_i64(),
            ),
            map_category_row,
        )?;

    Ok(category)
}

/// Retrieve a category owned by `user_id` by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a category owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(
    id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_category_row,
        )?;

    Ok(category)
}

/// Check whether `user_id` already has a category called `name` of the given
/// type, ignoring the category `exclude_id` so updates do not collide with
/// themselves.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn category_name_exists(
    name: &str,
    category_type: TransactionType,
    exclude_id: Option<CategoryId>,
    user_id: UserId,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM category
         WHERE name = :name AND type = :type AND user_id = :user_id AND id != :exclude_id",
        rusqlite::named_params! {
            ":name": name,
            ":type": category_type,
            ":user_id": user_id.as_i64(),
            ":exclude_id": exclude_id.unwrap_or(-1),
        },
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Persist new field values for the category `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a category owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    id: CategoryId,
    user_id: UserId,
    new_category: &NewCategory,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, icon = ?2, type = ?3
         WHERE id = ?4 AND user_id = ?5",
        (
            &new_category.name,
            &new_category.icon,
            new_category.category_type,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the category `id` owned by `user_id`.
///
/// The caller must first check that no transactions reference the category.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a category owned by
///   `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(
    id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Retrieve the categories owned by `user_id`, optionally only those of one
/// type, ordered by name.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_categories(
    user_id: UserId,
    category_type: Option<TransactionType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category
             WHERE user_id = :user_id AND (:type IS NULL OR type = :type)
             ORDER BY name ASC"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":type": category_type,
            },
            map_category_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod category_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        transaction::TransactionType,
        user::{UserId, create_user},
    };

    use super::{
        NewCategory, category_name_exists, create_category, delete_category, get_category,
        list_categories, update_category,
    };

    fn get_test_connection() -> (Connection, UserId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("foo@bar.baz", &conn).unwrap();

        (conn, user.id)
    }

    fn new_category(name: &str, category_type: TransactionType) -> NewCategory {
        NewCategory {
            name: name.to_owned(),
            icon: "💡".to_owned(),
            category_type,
        }
    }

    #[test]
    fn create_and_get_round_trips() {
        let (conn, user_id) = get_test_connection();

        let created = create_category(
            &new_category("Utilities", TransactionType::Expense),
            user_id,
            &conn,
        )
        .unwrap();
        let fetched = get_category(created.id, user_id, &conn).unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.category_type, TransactionType::Expense);
    }

    #[test]
    fn same_name_allowed_across_types() {
        let (conn, user_id) = get_test_connection();
        create_category(
            &new_category("Other", TransactionType::Expense),
            user_id,
            &conn,
        )
        .unwrap();

        assert!(
            category_name_exists("Other", TransactionType::Expense, None, user_id, &conn).unwrap()
        );
        assert!(
            !category_name_exists("Other", TransactionType::Income, None, user_id, &conn).unwrap()
        );
    }

    #[test]
    fn update_persists_new_values() {
        let (conn, user_id) = get_test_connection();
        let created = create_category(
            &new_category("Utilities", TransactionType::Expense),
            user_id,
            &conn,
        )
        .unwrap();

        update_category(
            created.id,
            user_id,
            &new_category("Bills", TransactionType::Expense),
            &conn,
        )
        .unwrap();

        let fetched = get_category(created.id, user_id, &conn).unwrap();
        assert_eq!(fetched.name, "Bills");
    }

    #[test]
    fn delete_fails_for_missing_category() {
        let (conn, user_id) = get_test_connection();

        assert_eq!(delete_category(1337, user_id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn list_filters_by_type_and_orders_by_name() {
        let (conn, user_id) = get_test_connection();
        create_category(
            &new_category("Utilities", TransactionType::Expense),
            user_id,
            &conn,
        )
        .unwrap();
        create_category(
            &new_category("Groceries", TransactionType::Expense),
            user_id,
            &conn,
        )
        .unwrap();
        create_category(
            &new_category("Salary", TransactionType::Income),
            user_id,
            &conn,
        )
        .unwrap();

        let expenses = list_categories(user_id, Some(TransactionType::Expense), &conn).unwrap();
        let all = list_categories(user_id, None, &conn).unwrap();

        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].name, "Groceries");
        assert_eq!(all.len(), 3);
    }
}
