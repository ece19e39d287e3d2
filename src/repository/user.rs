use diesel::prelude::*;

use crate::domain::types::{Email, Role, UserId, Username};
use crate::domain::user::{NewUser, User};
use crate::models::user::{DbRole, NewUser as DbNewUser, NewUserRole, User as DbUser};
use crate::repository::{
    DieselRepository, Outcome, RepositoryError, RepositoryResult, UserReader, UserWriter,
    conflict_on_violation,
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn list_user_roles(&self, id: UserId) -> RepositoryResult<Vec<Role>> {
        use crate::schema::{roles, user_roles};

        let mut conn = self.conn()?;

        let roles = user_roles::table
            .inner_join(roles::table)
            .filter(user_roles::user_id.eq(id.get()))
            .select(DbRole::as_select())
            .order(roles::id.asc())
            .load::<DbRole>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Role>, _>>()?;

        Ok(roles)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<Outcome<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let result = conn.immediate_transaction::<Outcome<User>, RepositoryError, _>(|conn| {
            let taken = users::table
                .filter(
                    users::username
                        .eq(user.username.as_str())
                        .or(users::email.eq(user.email.as_str())),
                )
                .select(users::id)
                .first::<i32>(conn)
                .optional()?;
            if taken.is_some() {
                return Ok(Outcome::Conflict);
            }

            let created = diesel::insert_into(users::table)
                .values(DbNewUser::from(user))
                .returning(DbUser::as_returning())
                .get_result::<DbUser>(conn)?;

            let created: User = created.try_into()?;
            Ok(Outcome::Success(created))
        });

        conflict_on_violation(result)
    }

    fn assign_role(&self, id: UserId, role: Role) -> RepositoryResult<Outcome<()>> {
        use crate::schema::{roles, user_roles, users};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<Outcome<()>, RepositoryError, _>(|conn| {
            let user = users::table
                .find(id.get())
                .select(users::id)
                .first::<i32>(conn)
                .optional()?;
            let role_id = roles::table
                .filter(roles::name.eq(role.as_str()))
                .select(roles::id)
                .first::<i32>(conn)
                .optional()?;

            let (Some(user_id), Some(role_id)) = (user, role_id) else {
                return Ok(Outcome::NotFound);
            };

            diesel::insert_or_ignore_into(user_roles::table)
                .values(NewUserRole { user_id, role_id })
                .execute(conn)?;

            Ok(Outcome::Success(()))
        })
    }

    fn ensure_roles(&self, roles: &[Role]) -> RepositoryResult<usize> {
        use crate::schema::roles as roles_table;

        let mut conn = self.conn()?;

        let mut added = 0;
        for role in roles {
            added += diesel::insert_or_ignore_into(roles_table::table)
                .values(roles_table::name.eq(role.as_str()))
                .execute(&mut conn)?;
        }

        Ok(added)
    }
}
