use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName};

/// Catalog category a book belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
}
