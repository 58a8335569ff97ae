//! Validation for the category create and update request bodies.

use serde::Deserialize;

use crate::{Error, response::FieldError, transaction::TransactionType};

use super::core::NewCategory;

/// The request body for creating or updating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    /// The display name of the category.
    pub name: String,
    /// An emoji or short glyph shown next to the name.
    pub icon: String,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

impl CategoryForm {
    /// Validate the form fields, returning the values to persist.
    ///
    /// # Errors
    /// This function will return an [Error::Validation] naming every invalid
    /// field.
    pub fn validate(self) -> Result<NewCategory, Error> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_owned();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Please enter a category name"));
        }

        let icon = self.icon.trim().to_owned();
        if icon.is_empty() {
            errors.push(FieldError::new("icon", "Please pick an icon"));
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(NewCategory {
            name,
            icon,
            category_type: self.category_type,
        })
    }
}
