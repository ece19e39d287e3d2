use crate::db::{DbConnection, DbPool};
use crate::domain::book::{Book, NewBook};
use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{BookId, CategoryId, CategoryName, Email, Role, UserId, Username};
use crate::domain::user::{NewUser, User};
use crate::domain::user_book::UserBook;

pub mod book;
pub mod category;
pub mod errors;
pub mod user;
pub mod user_book;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Result of a write whose preconditions may not hold.
///
/// Every writer documents which variants it can produce; callers are expected
/// to match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Conflict,
    NotFound,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Conflict => Outcome::Conflict,
            Outcome::NotFound => Outcome::NotFound,
        }
    }
}

/// Collapse a constraint violation raised by the store into
/// [`Outcome::Conflict`].
///
/// Writers run their existence checks inside an immediate transaction, so a
/// racing writer waits on the write lock and then sees the committed row.
/// The unique indexes and foreign keys remain the final authority.
pub(crate) fn conflict_on_violation<T>(
    result: RepositoryResult<Outcome<T>>,
) -> RepositoryResult<Outcome<T>> {
    match result {
        Err(err) if err.is_constraint_violation() => Ok(Outcome::Conflict),
        other => other,
    }
}

/// Read-only operations for user accounts.
pub trait UserReader {
    /// Retrieve a user by its identifier.
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Retrieve a user by email address, ignoring ASCII case.
    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
    /// Retrieve a user by login name, ignoring ASCII case.
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
    /// List the roles assigned to a user. An empty list is a valid answer.
    fn list_user_roles(&self, id: UserId) -> RepositoryResult<Vec<Role>>;
}

/// Write operations for user accounts and role assignments.
pub trait UserWriter {
    /// Persist a new user.
    ///
    /// Returns `Conflict` when the username or the email is already taken.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<Outcome<User>>;
    /// Assign `role` to a user. Assigning a role twice is a no-op success.
    ///
    /// Returns `NotFound` when the user or the role row does not exist.
    fn assign_role(&self, id: UserId, role: Role) -> RepositoryResult<Outcome<()>>;
    /// Make sure every role in `roles` has a row. Returns how many were added.
    fn ensure_roles(&self, roles: &[Role]) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category. `Conflict` when the name is taken.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Outcome<Category>>;
    /// Rename a category.
    ///
    /// `NotFound` when the id is absent, `Conflict` when another category
    /// already uses the name.
    fn update_category(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> RepositoryResult<Outcome<()>>;
    /// Delete a category.
    ///
    /// `NotFound` when the id is absent, `Conflict` while books reference it.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<Outcome<()>>;
}

/// Read-only operations for book entities.
pub trait BookReader {
    /// List every book with its category, ordered by id.
    fn list_books(&self) -> RepositoryResult<Vec<Book>>;
    /// Retrieve a book and its category by identifier.
    fn get_book_by_id(&self, id: BookId) -> RepositoryResult<Option<Book>>;
}

/// Write operations for book entities.
pub trait BookWriter {
    /// Persist a new book.
    ///
    /// `Conflict` when a book with the same title and author exists or when
    /// the named category does not.
    fn create_book(&self, book: &NewBook) -> RepositoryResult<Outcome<Book>>;
    /// Overwrite every field of an existing book.
    ///
    /// `NotFound` when the id or the named category is absent, `Conflict`
    /// when another book already has the new title and author.
    fn update_book(&self, id: BookId, book: &NewBook) -> RepositoryResult<Outcome<()>>;
    /// Delete a book and, through the store, its user-book associations.
    ///
    /// `NotFound` when the id is absent.
    fn delete_book(&self, id: BookId) -> RepositoryResult<Outcome<()>>;
}

/// Read-only operations for personal libraries.
pub trait UserBookReader {
    /// List the books in a user's library. Empty when there are none.
    fn list_user_books(&self, user_id: UserId) -> RepositoryResult<Vec<UserBook>>;
}

/// Write operations for personal libraries.
pub trait UserBookWriter {
    /// Add a book to a user's library.
    ///
    /// `Conflict` when the book is already there or does not exist.
    fn add_user_book(&self, user_id: UserId, book_id: BookId) -> RepositoryResult<Outcome<()>>;
    /// Remove a book from a user's library. `NotFound` when it is not there.
    fn remove_user_book(&self, user_id: UserId, book_id: BookId)
    -> RepositoryResult<Outcome<()>>;
}
