use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::book::Book;
use crate::domain::types::{UserBookId, UserId};

/// A book placed in a user's personal library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserBook {
    pub id: UserBookId,
    pub user_id: UserId,
    pub book: Book,
    pub added_at: NaiveDateTime,
}
