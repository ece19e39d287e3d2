use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::domain::types::{BookId, Role, UserId};
use crate::dto::user_books::UserBookDto;
use crate::repository::{Outcome, UserBookReader, UserBookWriter, UserReader};

use super::{ServiceError, ServiceResult};

/// Resolve the caller to a stored account. A token whose subject no longer
/// exists is treated as unauthorized.
fn current_user_id<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<UserId>
where
    R: UserReader,
{
    if !check_role(Role::User, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let Some(user_id) = user.user_id() else {
        log::error!("Token subject {} is not a user id", user.sub);
        return Err(ServiceError::Unauthorized);
    };

    match repo.get_user_by_id(user_id) {
        Ok(Some(found)) => Ok(found.id),
        Ok(None) => {
            log::error!("User {user_id} not found.");
            Err(ServiceError::Unauthorized)
        }
        Err(e) => {
            log::error!("Failed to look up user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_user_books<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<UserBookDto>>
where
    R: UserReader + UserBookReader,
{
    let user_id = current_user_id(user, repo)?;

    match repo.list_user_books(user_id) {
        Ok(books) => Ok(books.into_iter().map(UserBookDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list user books: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn add_user_book<R>(book_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: UserReader + UserBookWriter,
{
    let user_id = current_user_id(user, repo)?;

    let conflict =
        || ServiceError::Conflict("Book already in your library or does not exist.".to_string());
    let book_id = BookId::new(book_id).map_err(|_| conflict())?;

    match repo.add_user_book(user_id, book_id) {
        Ok(Outcome::Success(())) => Ok(()),
        Ok(Outcome::Conflict | Outcome::NotFound) => Err(conflict()),
        Err(e) => {
            log::error!("Failed to add user book: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn remove_user_book<R>(book_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: UserReader + UserBookWriter,
{
    let user_id = current_user_id(user, repo)?;

    let not_found = || ServiceError::NotFound("Book not found in your library".to_string());
    let book_id = BookId::new(book_id).map_err(|_| not_found())?;

    match repo.remove_user_book(user_id, book_id) {
        Ok(Outcome::Success(())) => Ok(()),
        Ok(Outcome::NotFound | Outcome::Conflict) => Err(not_found()),
        Err(e) => {
            log::error!("Failed to remove user book: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::book::Book;
    use crate::domain::category::Category;
    use crate::domain::types::{
        AuthorName, BookContent, BookTitle, CategoryId, CategoryName, Email, PasswordHash,
        Username,
    };
    use crate::domain::user::User;
    use crate::repository::test::TestRepository;

    fn reader() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "alice@x.com".into(),
            name: "alice01".into(),
            roles: vec!["User".into()],
        }
    }

    fn stored_user() -> User {
        User {
            id: UserId::new(1).unwrap(),
            username: Username::new("alice01").unwrap(),
            email: Email::new("alice@x.com").unwrap(),
            password_hash: PasswordHash::new("$argon2id$stub").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn repo() -> TestRepository {
        let category = Category {
            id: CategoryId::new(1).unwrap(),
            name: CategoryName::new("SciFi").unwrap(),
        };
        let book = Book {
            id: BookId::new(1).unwrap(),
            title: BookTitle::new("Dune").unwrap(),
            author: AuthorName::new("Herbert").unwrap(),
            content: BookContent::new("Spice").unwrap(),
            published_year: 1965,
            category: category.clone(),
        };
        TestRepository::new(vec![category], vec![book]).with_user(stored_user(), vec![Role::User])
    }

    #[test]
    fn empty_library_lists_nothing() {
        assert!(list_user_books(&reader(), &repo()).unwrap().is_empty());
    }

    #[test]
    fn adding_twice_conflicts_and_keeps_one_row() {
        let repo = repo();
        assert!(add_user_book(1, &reader(), &repo).is_ok());
        assert_eq!(
            add_user_book(1, &reader(), &repo),
            Err(ServiceError::Conflict(
                "Book already in your library or does not exist.".into()
            ))
        );
        assert_eq!(repo.user_book_count(), 1);

        let books = list_user_books(&reader(), &repo).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].book.title, "Dune");
    }

    #[test]
    fn adding_unknown_book_conflicts() {
        assert!(matches!(
            add_user_book(99, &reader(), &repo()),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn removing_absent_pair_is_not_found() {
        let repo = repo();
        assert_eq!(
            remove_user_book(1, &reader(), &repo),
            Err(ServiceError::NotFound("Book not found in your library".into()))
        );
        add_user_book(1, &reader(), &repo).unwrap();
        assert!(remove_user_book(1, &reader(), &repo).is_ok());
        assert_eq!(repo.user_book_count(), 0);
    }

    #[test]
    fn unknown_subject_is_unauthorized() {
        let mut ghost = reader();
        ghost.sub = "42".into();
        assert_eq!(
            list_user_books(&ghost, &repo()),
            Err(ServiceError::Unauthorized)
        );
    }
}
