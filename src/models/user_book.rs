use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user_book::UserBook as DomainUserBook;
use crate::domain::types::TypeConstraintError;
use crate::models::book::Book;
use crate::models::category::Category;

/// Diesel model representing the `user_books` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::user_books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserBook {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub added_at: NaiveDateTime,
}

/// Insertable form of [`UserBook`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::user_books)]
pub struct NewUserBook {
    pub user_id: i32,
    pub book_id: i32,
    pub added_at: NaiveDateTime,
}

impl TryFrom<(UserBook, Book, Category)> for DomainUserBook {
    type Error = TypeConstraintError;

    fn try_from(
        (user_book, book, category): (UserBook, Book, Category),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user_book.id.try_into()?,
            user_id: user_book.user_id.try_into()?,
            book: (book, category).try_into()?,
            added_at: user_book.added_at,
        })
    }
}
