//! Validation for the budget create and update request bodies.

use serde::Deserialize;
use time::Date;

use crate::{Error, database_id::CategoryId, response::FieldError};

use super::core::NewBudget;

/// The request body for creating or updating a budget.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetForm {
    /// A short name for the budget.
    pub name: String,
    /// The total amount of money allocated to the budget.
    pub amount: f64,
    /// The ID of the expense category the budget covers.
    pub category: CategoryId,
    /// The first day the budget applies to, if bounded.
    pub start_date: Option<Date>,
    /// The last day the budget applies to, if bounded.
    pub end_date: Option<Date>,
}

impl BudgetForm {
    /// Validate the form fields, returning the values to persist.
    ///
    /// # Errors
    /// This function will return an [Error::Validation] naming every invalid
    /// field.
    pub fn validate(self) -> Result<NewBudget, Error> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_owned();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Please enter a budget name"));
        }

        if self.amount <= 0.0 {
            errors.push(FieldError::new("amount", "Amount must be greater than 0"));
        }

        match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) if start_date > end_date => {
                errors.push(FieldError::new(
                    "end_date",
                    "End date must not be before the start date",
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                errors.push(FieldError::new(
                    "start_date",
                    "Start and end dates must be provided together",
                ));
            }
            _ => {}
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(NewBudget {
            name,
            amount: self.amount,
            category_id: self.category,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}
