use chrono::Utc;
use diesel::prelude::*;

use crate::domain::types::{BookId, UserId};
use crate::domain::user_book::UserBook;
use crate::models::book::Book as DbBook;
use crate::models::category::Category as DbCategory;
use crate::models::user_book::{NewUserBook, UserBook as DbUserBook};
use crate::repository::{
    DieselRepository, Outcome, RepositoryError, RepositoryResult, UserBookReader,
    UserBookWriter, conflict_on_violation,
};

impl UserBookReader for DieselRepository {
    fn list_user_books(&self, user_id: UserId) -> RepositoryResult<Vec<UserBook>> {
        use crate::schema::{books, categories, user_books};

        let mut conn = self.conn()?;

        let items = user_books::table
            .inner_join(books::table.inner_join(categories::table))
            .filter(user_books::user_id.eq(user_id.get()))
            .select((
                DbUserBook::as_select(),
                DbBook::as_select(),
                DbCategory::as_select(),
            ))
            .order(user_books::id.asc())
            .load::<(DbUserBook, DbBook, DbCategory)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<UserBook>, _>>()?;

        Ok(items)
    }
}

impl UserBookWriter for DieselRepository {
    fn add_user_book(&self, user_id: UserId, book_id: BookId) -> RepositoryResult<Outcome<()>> {
        use crate::schema::{books, user_books};

        let mut conn = self.conn()?;

        let result = conn.immediate_transaction::<Outcome<()>, RepositoryError, _>(|conn| {
            let already_added = user_books::table
                .filter(user_books::user_id.eq(user_id.get()))
                .filter(user_books::book_id.eq(book_id.get()))
                .select(user_books::id)
                .first::<i32>(conn)
                .optional()?;
            if already_added.is_some() {
                return Ok(Outcome::Conflict);
            }

            let book = books::table
                .find(book_id.get())
                .select(books::id)
                .first::<i32>(conn)
                .optional()?;
            if book.is_none() {
                return Ok(Outcome::Conflict);
            }

            diesel::insert_into(user_books::table)
                .values(NewUserBook {
                    user_id: user_id.get(),
                    book_id: book_id.get(),
                    added_at: Utc::now().naive_utc(),
                })
                .execute(conn)?;

            Ok(Outcome::Success(()))
        });

        conflict_on_violation(result)
    }

    fn remove_user_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> RepositoryResult<Outcome<()>> {
        use crate::schema::user_books;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            user_books::table
                .filter(user_books::user_id.eq(user_id.get()))
                .filter(user_books::book_id.eq(book_id.get())),
        )
        .execute(&mut conn)?;

        Ok(match affected {
            0 => Outcome::NotFound,
            _ => Outcome::Success(()),
        })
    }
}
