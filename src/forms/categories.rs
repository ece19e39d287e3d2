use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::domain::types::{CategoryName, TypeConstraintError};

/// Body of `POST /api/category` and `PUT /api/category/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory { name: self.name }
    }
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: CategoryName::new(value.name)?,
        })
    }
}
