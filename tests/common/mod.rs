//! Helpers for integration tests.
#![allow(dead_code)]

use pushkind_library::db::{DbPool, establish_connection_pool, run_migrations};
use pushkind_library::domain::category::{Category, NewCategory};
use pushkind_library::domain::types::CategoryName;
use pushkind_library::repository::{CategoryWriter, DieselRepository, Outcome, UserWriter};
use pushkind_library::domain::types::Role;
use tempfile::NamedTempFile;

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        run_migrations(&mut conn).expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repository(&self) -> DieselRepository {
        let repo = DieselRepository::new(self.pool());
        repo.ensure_roles(&Role::ALL).expect("roles should be seeded");
        repo
    }
}

pub fn create_category(repo: &DieselRepository, name: &str) -> Category {
    let category = NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
    };
    match repo.create_category(&category).expect("should create category") {
        Outcome::Success(category) => category,
        other => panic!("unexpected outcome {other:?}"),
    }
}
