//! Validation for the transaction create and update request bodies.

use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    budget::get_budget,
    category::get_category,
    database_id::{BudgetId, CategoryId},
    response::FieldError,
    user::UserId,
};

use super::core::{NewTransaction, TransactionType};

/// The request body for creating or updating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// A short name for the transaction.
    pub name: String,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// An optional longer description of the transaction.
    pub description: Option<String>,
    /// The day the transaction happened.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category: CategoryId,
    /// The ID of the budget the expense counts against, if any.
    pub budget: Option<BudgetId>,
}

impl TransactionForm {
    /// Validate the form fields, returning the values to persist.
    ///
    /// # Errors
    /// This function will return an [Error::Validation] naming every invalid
    /// field.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_owned();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Please enter a transaction name"));
        }

        if self.amount <= 0.0 {
            errors.push(FieldError::new("amount", "Amount must be greater than 0"));
        } else if !has_at_most_two_decimal_places(self.amount) {
            errors.push(FieldError::new("amount", "Amount must be in 2 decimal places"));
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(NewTransaction {
            name,
            amount: self.amount,
            description: self.description,
            date: self.date,
            transaction_type: self.transaction_type,
            category_id: self.category,
            budget_id: self.budget,
        })
    }
}

/// Whether `amount` is representable in whole cents.
fn has_at_most_two_decimal_places(amount: f64) -> bool {
    let cents = amount * 100.0;
    (cents - cents.round()).abs() < 1e-6
}

/// Check the category and budget references in `new_transaction` against the
/// rows `user_id` actually owns.
///
/// Income transactions may not name a budget, and an expense's budget must
/// cover the same category as the transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the category or budget does not belong to
///   `user_id`,
/// - [Error::Validation] if the references are inconsistent,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn check_references(
    new_transaction: &NewTransaction,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let category = get_category(new_transaction.category_id, user_id, connection)?;

    if category.category_type != new_transaction.transaction_type {
        return Err(Error::Validation(vec![FieldError::new(
            "category",
            "The category type does not match the transaction type",
        )]));
    }

    match (new_transaction.transaction_type, new_transaction.budget_id) {
        (TransactionType::Income, Some(_)) => Err(Error::Validation(vec![FieldError::new(
            "budget",
            "Income transactions cannot be assigned to a budget",
        )])),
        (TransactionType::Expense, Some(budget_id)) => {
            let budget = get_budget(budget_id, user_id, connection)?;

            if budget.category_id != new_transaction.category_id {
                return Err(Error::Validation(vec![FieldError::new(
                    "budget",
                    "The budget does not cover the selected category",
                )]));
            }

            Ok(())
        }
        (_, None) => Ok(()),
    }
}
