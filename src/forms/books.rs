use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::book::NewBook;
use crate::domain::types::{AuthorName, BookContent, BookTitle, CategoryName, TypeConstraintError};

/// Body of `POST /api/book` and `PUT /api/book/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub published_year: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookFormPayload {
    pub book: NewBook,
}

#[derive(Debug, Error)]
pub enum BookFormError {
    #[error("Book form validation failed: {0}")]
    Validation(String),
    #[error("Book form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for BookFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for BookFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<BookForm> for BookFormPayload {
    type Error = BookFormError;

    fn try_from(value: BookForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            book: NewBook {
                title: BookTitle::new(value.title)?,
                author: AuthorName::new(value.author)?,
                content: BookContent::new(value.content)?,
                published_year: value.published_year,
                category: CategoryName::new(value.category)?,
            },
        })
    }
}
