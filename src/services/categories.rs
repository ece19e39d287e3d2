use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::domain::types::{CategoryId, Role};
use crate::dto::categories::CategoryDto;
use crate::forms::categories::CategoryFormPayload;
use crate::repository::{CategoryReader, CategoryWriter, Outcome};

use super::{ServiceError, ServiceResult};

const NAME_TAKEN: &str = "Category with this name already exists.";

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(Role::Admin, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

fn not_found(category_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Category with ID {category_id} not found."))
}

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_category<R>(
    category_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    ensure_admin(user)?;

    let missing = || ServiceError::NotFound(format!("Category with Id: {category_id} not found."));
    let id = CategoryId::new(category_id).map_err(|_| missing())?;

    match repo.get_category_by_id(id) {
        Ok(Some(category)) => Ok(CategoryDto::from(category)),
        Ok(None) => Err(missing()),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_category<R>(
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;

    match repo.create_category(&payload.into_new_category()) {
        Ok(Outcome::Success(category)) => Ok(CategoryDto::from(category)),
        Ok(Outcome::Conflict | Outcome::NotFound) => {
            Err(ServiceError::Conflict(NAME_TAKEN.to_string()))
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn update_category<R>(
    category_id: i32,
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;

    let id = CategoryId::new(category_id).map_err(|_| not_found(category_id))?;

    match repo.update_category(id, &payload.name) {
        Ok(Outcome::Success(())) => Ok(()),
        Ok(Outcome::NotFound) => Err(not_found(category_id)),
        Ok(Outcome::Conflict) => Err(ServiceError::Conflict(NAME_TAKEN.to_string())),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_category<R>(
    category_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;

    let id = CategoryId::new(category_id).map_err(|_| not_found(category_id))?;

    match repo.delete_category(id) {
        Ok(Outcome::Success(())) => Ok(()),
        Ok(Outcome::NotFound) => Err(not_found(category_id)),
        Ok(Outcome::Conflict) => Err(ServiceError::Conflict("Category is in use".to_string())),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::Book;
    use crate::domain::category::Category;
    use crate::domain::types::{AuthorName, BookContent, BookId, BookTitle, CategoryName};
    use crate::repository::test::TestRepository;

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "admin@example.com".into(),
            name: "administrator".into(),
            roles: vec!["Admin".into()],
        }
    }

    fn category(id: i32, name: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
        }
    }

    fn payload(name: &str) -> CategoryFormPayload {
        CategoryFormPayload {
            name: CategoryName::new(name).unwrap(),
        }
    }

    #[test]
    fn lists_categories_by_name() {
        let repo = TestRepository::new(vec![category(1, "Poetry"), category(2, "Drama")], vec![]);
        let names: Vec<String> = list_categories(&repo)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Drama", "Poetry"]);
    }

    #[test]
    fn create_rejects_taken_name() {
        let repo = TestRepository::new(vec![category(1, "Poetry")], vec![]);
        assert_eq!(
            create_category(payload("Poetry"), &admin(), &repo),
            Err(ServiceError::Conflict(NAME_TAKEN.into()))
        );
        assert_eq!(
            create_category(payload("Drama"), &admin(), &repo).unwrap().id,
            2
        );
    }

    #[test]
    fn get_requires_admin() {
        let repo = TestRepository::new(vec![category(1, "Poetry")], vec![]);
        let mut user = admin();
        user.roles.clear();
        assert_eq!(get_category(1, &user, &repo), Err(ServiceError::Unauthorized));
        assert_eq!(get_category(1, &admin(), &repo).unwrap().name, "Poetry");
    }

    #[test]
    fn update_reports_missing_and_taken() {
        let repo = TestRepository::new(vec![category(1, "Poetry"), category(2, "Drama")], vec![]);
        assert_eq!(
            update_category(7, payload("Prose"), &admin(), &repo),
            Err(ServiceError::NotFound("Category with ID 7 not found.".into()))
        );
        assert_eq!(
            update_category(1, payload("Drama"), &admin(), &repo),
            Err(ServiceError::Conflict(NAME_TAKEN.into()))
        );
        assert!(update_category(1, payload("Prose"), &admin(), &repo).is_ok());
    }

    #[test]
    fn delete_is_refused_while_books_use_category() {
        let book = Book {
            id: BookId::new(1).unwrap(),
            title: BookTitle::new("Hamlet").unwrap(),
            author: AuthorName::new("Shakespeare").unwrap(),
            content: BookContent::new("To be").unwrap(),
            published_year: 1603,
            category: category(2, "Drama"),
        };
        let repo = TestRepository::new(vec![category(1, "Poetry"), category(2, "Drama")], vec![book]);

        assert_eq!(
            delete_category(2, &admin(), &repo),
            Err(ServiceError::Conflict("Category is in use".into()))
        );
        assert!(delete_category(1, &admin(), &repo).is_ok());
        assert!(matches!(
            get_category(1, &admin(), &repo),
            Err(ServiceError::NotFound(_))
        ));
    }
}
