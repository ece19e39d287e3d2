use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::domain::types::{BookId, Role};
use crate::dto::books::BookDto;
use crate::forms::books::BookFormPayload;
use crate::repository::{BookReader, BookWriter, Outcome};

use super::{ServiceError, ServiceResult};

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(Role::Admin, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub fn list_books<R>(repo: &R) -> ServiceResult<Vec<BookDto>>
where
    R: BookReader,
{
    match repo.list_books() {
        Ok(books) => Ok(books.into_iter().map(BookDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list books: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_book<R>(book_id: i32, repo: &R) -> ServiceResult<BookDto>
where
    R: BookReader,
{
    let not_found = || ServiceError::NotFound(format!("Book with Id: {book_id} not found."));
    let id = BookId::new(book_id).map_err(|_| not_found())?;

    match repo.get_book_by_id(id) {
        Ok(Some(book)) => Ok(BookDto::from(book)),
        Ok(None) => Err(not_found()),
        Err(e) => {
            log::error!("Failed to get book: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_book<R>(
    payload: BookFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<BookDto>
where
    R: BookWriter,
{
    ensure_admin(user)?;

    match repo.create_book(&payload.book) {
        Ok(Outcome::Success(book)) => Ok(BookDto::from(book)),
        Ok(Outcome::Conflict | Outcome::NotFound) => Err(ServiceError::Conflict(
            "This book already exist or current category does not exist.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to create book: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn update_book<R>(
    book_id: i32,
    payload: BookFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: BookWriter,
{
    ensure_admin(user)?;

    let not_found = || {
        ServiceError::NotFound(format!(
            "Book with Id {book_id} not found or current category does not exists."
        ))
    };
    let id = BookId::new(book_id).map_err(|_| not_found())?;

    match repo.update_book(id, &payload.book) {
        Ok(Outcome::Success(())) => Ok(()),
        Ok(Outcome::NotFound) => Err(not_found()),
        Ok(Outcome::Conflict) => Err(ServiceError::Conflict(
            "Book with this title and author already exists.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to update book: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_book<R>(book_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: BookWriter,
{
    ensure_admin(user)?;

    let not_found = || ServiceError::NotFound(format!("Book with Id {book_id} not found."));
    let id = BookId::new(book_id).map_err(|_| not_found())?;

    match repo.delete_book(id) {
        Ok(Outcome::Success(())) => Ok(()),
        Ok(Outcome::NotFound | Outcome::Conflict) => Err(not_found()),
        Err(e) => {
            log::error!("Failed to delete book: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Book, NewBook};
    use crate::domain::category::Category;
    use crate::domain::types::{AuthorName, BookContent, BookTitle, CategoryId, CategoryName};
    use crate::repository::test::TestRepository;

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "admin@example.com".into(),
            name: "administrator".into(),
            roles: vec!["Admin".into()],
        }
    }

    fn sample_category() -> Category {
        Category {
            id: CategoryId::new(1).unwrap(),
            name: CategoryName::new("SciFi").unwrap(),
        }
    }

    fn sample_book() -> Book {
        Book {
            id: BookId::new(1).unwrap(),
            title: BookTitle::new("Dune").unwrap(),
            author: AuthorName::new("Herbert").unwrap(),
            content: BookContent::new("Spice").unwrap(),
            published_year: 1965,
            category: sample_category(),
        }
    }

    fn payload(title: &str, category: &str) -> BookFormPayload {
        BookFormPayload {
            book: NewBook {
                title: BookTitle::new(title).unwrap(),
                author: AuthorName::new("Herbert").unwrap(),
                content: BookContent::new("Spice").unwrap(),
                published_year: 1965,
                category: CategoryName::new(category).unwrap(),
            },
        }
    }

    #[test]
    fn gets_existing_book_and_reports_missing_ones() {
        let repo = TestRepository::new(vec![sample_category()], vec![sample_book()]);

        assert_eq!(get_book(1, &repo).unwrap().title, "Dune");
        assert_eq!(
            get_book(9, &repo),
            Err(ServiceError::NotFound("Book with Id: 9 not found.".into()))
        );
        assert!(matches!(get_book(0, &repo), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn create_conflicts_on_duplicate_or_unknown_category() {
        let repo = TestRepository::new(vec![sample_category()], vec![sample_book()]);
        let conflict = Err(ServiceError::Conflict(
            "This book already exist or current category does not exist.".into(),
        ));

        assert_eq!(create_book(payload("Dune", "SciFi"), &admin(), &repo), conflict);
        assert_eq!(create_book(payload("Emma", "Romance"), &admin(), &repo), conflict);

        let created = create_book(payload("Dune Messiah", "SciFi"), &admin(), &repo).unwrap();
        assert_eq!(created.category_id, 1);
        assert_eq!(list_books(&repo).unwrap().len(), 2);
    }

    #[test]
    fn writes_require_admin() {
        let repo = TestRepository::new(vec![sample_category()], vec![sample_book()]);
        let mut user = admin();
        user.roles = vec!["User".into()];

        assert_eq!(
            create_book(payload("Other", "SciFi"), &user, &repo),
            Err(ServiceError::Unauthorized)
        );
        assert_eq!(delete_book(1, &user, &repo), Err(ServiceError::Unauthorized));
    }

    #[test]
    fn update_of_absent_book_or_category_is_not_found() {
        let repo = TestRepository::new(vec![sample_category()], vec![sample_book()]);

        assert!(matches!(
            update_book(42, payload("Dune", "SciFi"), &admin(), &repo),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            update_book(1, payload("Dune", "Romance"), &admin(), &repo),
            Err(ServiceError::NotFound(_))
        ));
        assert!(update_book(1, payload("Dune (revised)", "SciFi"), &admin(), &repo).is_ok());
        assert_eq!(get_book(1, &repo).unwrap().title, "Dune (revised)");
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let repo = TestRepository::new(vec![sample_category()], vec![sample_book()]);

        assert!(delete_book(1, &admin(), &repo).is_ok());
        assert!(matches!(get_book(1, &repo), Err(ServiceError::NotFound(_))));
        assert_eq!(
            delete_book(1, &admin(), &repo),
            Err(ServiceError::NotFound("Book with Id 1 not found.".into()))
        );
    }
}
