use diesel::prelude::*;

use crate::domain::book::{Book, NewBook};
use crate::domain::types::BookId;
use crate::models::book::{Book as DbBook, NewBook as DbNewBook};
use crate::models::category::Category as DbCategory;
use crate::repository::{
    BookReader, BookWriter, DieselRepository, Outcome, RepositoryError, RepositoryResult,
    conflict_on_violation,
};

impl BookReader for DieselRepository {
    fn list_books(&self) -> RepositoryResult<Vec<Book>> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;

        let items = books::table
            .inner_join(categories::table)
            .select((DbBook::as_select(), DbCategory::as_select()))
            .order(books::id.asc())
            .load::<(DbBook, DbCategory)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Book>, _>>()?;

        Ok(items)
    }

    fn get_book_by_id(&self, id: BookId) -> RepositoryResult<Option<Book>> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;

        let book = books::table
            .inner_join(categories::table)
            .filter(books::id.eq(id.get()))
            .select((DbBook::as_select(), DbCategory::as_select()))
            .first::<(DbBook, DbCategory)>(&mut conn)
            .optional()?;

        let book = book.map(TryInto::try_into).transpose()?;
        Ok(book)
    }
}

impl BookWriter for DieselRepository {
    fn create_book(&self, book: &NewBook) -> RepositoryResult<Outcome<Book>> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;

        let result = conn.immediate_transaction::<Outcome<Book>, RepositoryError, _>(|conn| {
            let duplicate = books::table
                .filter(books::title.eq(book.title.as_str()))
                .filter(books::author.eq(book.author.as_str()))
                .select(books::id)
                .first::<i32>(conn)
                .optional()?;
            if duplicate.is_some() {
                return Ok(Outcome::Conflict);
            }

            let Some(category) = categories::table
                .filter(categories::name.eq(book.category.as_str()))
                .first::<DbCategory>(conn)
                .optional()?
            else {
                return Ok(Outcome::Conflict);
            };

            let created = diesel::insert_into(books::table)
                .values(DbNewBook {
                    title: book.title.as_str(),
                    author: book.author.as_str(),
                    content: book.content.as_str(),
                    published_year: book.published_year,
                    category_id: category.id,
                })
                .returning(DbBook::as_returning())
                .get_result::<DbBook>(conn)?;

            let created: Book = (created, category).try_into()?;
            Ok(Outcome::Success(created))
        });

        conflict_on_violation(result)
    }

    fn update_book(&self, id: BookId, book: &NewBook) -> RepositoryResult<Outcome<()>> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;

        let result = conn.immediate_transaction::<Outcome<()>, RepositoryError, _>(|conn| {
            let existing = books::table
                .find(id.get())
                .select(books::id)
                .first::<i32>(conn)
                .optional()?;
            if existing.is_none() {
                return Ok(Outcome::NotFound);
            }

            let Some(category_id) = categories::table
                .filter(categories::name.eq(book.category.as_str()))
                .select(categories::id)
                .first::<i32>(conn)
                .optional()?
            else {
                return Ok(Outcome::NotFound);
            };

            let duplicate = books::table
                .filter(books::title.eq(book.title.as_str()))
                .filter(books::author.eq(book.author.as_str()))
                .filter(books::id.ne(id.get()))
                .select(books::id)
                .first::<i32>(conn)
                .optional()?;
            if duplicate.is_some() {
                return Ok(Outcome::Conflict);
            }

            diesel::update(books::table.find(id.get()))
                .set(DbNewBook {
                    title: book.title.as_str(),
                    author: book.author.as_str(),
                    content: book.content.as_str(),
                    published_year: book.published_year,
                    category_id,
                })
                .execute(conn)?;

            Ok(Outcome::Success(()))
        });

        conflict_on_violation(result)
    }

    fn delete_book(&self, id: BookId) -> RepositoryResult<Outcome<()>> {
        use crate::schema::books;

        let mut conn = self.conn()?;

        let affected = diesel::delete(books::table.find(id.get())).execute(&mut conn)?;

        Ok(match affected {
            0 => Outcome::NotFound,
            _ => Outcome::Success(()),
        })
    }
}
