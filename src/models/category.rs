use diesel::prelude::*;

use crate::domain::category::Category as DomainCategory;
use crate::domain::types::{CategoryName, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Insertable/patchable form of [`Category`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
        })
    }
}
