use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::user_book::UserBook;
use crate::dto::books::BookDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookDto {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub book: BookDto,
    pub added_at: NaiveDateTime,
}

impl From<UserBook> for UserBookDto {
    fn from(value: UserBook) -> Self {
        Self {
            id: value.id.get(),
            user_id: value.user_id.get(),
            book_id: value.book.id.get(),
            book: BookDto::from(value.book),
            added_at: value.added_at,
        }
    }
}
