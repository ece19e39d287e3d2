use serde::Serialize;

use crate::domain::book::Book;
use crate::dto::categories::CategoryDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub content: String,
    pub published_year: i32,
    pub category_id: i32,
    pub category: CategoryDto,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        Self {
            id: value.id.get(),
            title: value.title.into_inner(),
            author: value.author.into_inner(),
            content: value.content.into_inner(),
            published_year: value.published_year,
            category_id: value.category.id.get(),
            category: CategoryDto::from(value.category),
        }
    }
}
