use diesel::prelude::*;

use crate::domain::book::Book as DomainBook;
use crate::domain::types::{AuthorName, BookContent, BookTitle, TypeConstraintError};
use crate::models::category::Category;

/// Diesel model representing the `books` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub content: String,
    pub published_year: i32,
    pub category_id: i32,
}

/// Insertable/patchable form of [`Book`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::books)]
pub struct NewBook<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub content: &'a str,
    pub published_year: i32,
    pub category_id: i32,
}

impl TryFrom<(Book, Category)> for DomainBook {
    type Error = TypeConstraintError;

    fn try_from((book, category): (Book, Category)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: book.id.try_into()?,
            title: BookTitle::new(book.title)?,
            author: AuthorName::new(book.author)?,
            content: BookContent::new(book.content)?,
            published_year: book.published_year,
            category: category.try_into()?,
        })
    }
}
