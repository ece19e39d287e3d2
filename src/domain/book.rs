use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{AuthorName, BookContent, BookId, BookTitle, CategoryName};

/// Catalog book together with the category it is filed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: BookTitle,
    pub author: AuthorName,
    pub content: BookContent,
    pub published_year: i32,
    pub category: Category,
}

/// Information required to create or overwrite a [`Book`].
///
/// The category is referenced by name; the repository resolves it and treats
/// an unknown name as a failed precondition rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBook {
    pub title: BookTitle,
    pub author: AuthorName,
    pub content: BookContent,
    pub published_year: i32,
    pub category: CategoryName,
}
