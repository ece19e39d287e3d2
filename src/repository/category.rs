use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, CategoryName};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, Outcome, RepositoryError,
    RepositoryResult, conflict_on_violation,
};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id.get())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Outcome<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let result = conn.immediate_transaction::<Outcome<Category>, RepositoryError, _>(|conn| {
            let taken = categories::table
                .filter(categories::name.eq(category.name.as_str()))
                .select(categories::id)
                .first::<i32>(conn)
                .optional()?;
            if taken.is_some() {
                return Ok(Outcome::Conflict);
            }

            let created = diesel::insert_into(categories::table)
                .values(DbNewCategory {
                    name: category.name.as_str(),
                })
                .returning(DbCategory::as_returning())
                .get_result::<DbCategory>(conn)?;

            let created: Category = created.try_into()?;
            Ok(Outcome::Success(created))
        });

        conflict_on_violation(result)
    }

    fn update_category(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> RepositoryResult<Outcome<()>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let result = conn.immediate_transaction::<Outcome<()>, RepositoryError, _>(|conn| {
            let existing = categories::table
                .find(id.get())
                .select(categories::id)
                .first::<i32>(conn)
                .optional()?;
            if existing.is_none() {
                return Ok(Outcome::NotFound);
            }

            let taken = categories::table
                .filter(categories::name.eq(name.as_str()))
                .filter(categories::id.ne(id.get()))
                .select(categories::id)
                .first::<i32>(conn)
                .optional()?;
            if taken.is_some() {
                return Ok(Outcome::Conflict);
            }

            diesel::update(categories::table.find(id.get()))
                .set(categories::name.eq(name.as_str()))
                .execute(conn)?;

            Ok(Outcome::Success(()))
        });

        conflict_on_violation(result)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<Outcome<()>> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;

        let result = conn.immediate_transaction::<Outcome<()>, RepositoryError, _>(|conn| {
            let existing = categories::table
                .find(id.get())
                .select(categories::id)
                .first::<i32>(conn)
                .optional()?;
            if existing.is_none() {
                return Ok(Outcome::NotFound);
            }

            let in_use = books::table
                .filter(books::category_id.eq(id.get()))
                .count()
                .get_result::<i64>(conn)?;
            if in_use > 0 {
                return Ok(Outcome::Conflict);
            }

            diesel::delete(categories::table.find(id.get())).execute(conn)?;

            Ok(Outcome::Success(()))
        });

        conflict_on_violation(result)
    }
}
