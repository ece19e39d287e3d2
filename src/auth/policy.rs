//! Route access table consulted by the authorization gate.

use crate::domain::types::Role;

/// What a caller must present to reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Role(Role),
}

struct Rule {
    method: &'static str,
    path: &'static str,
    access: Access,
}

const fn rule(method: &'static str, path: &'static str, access: Access) -> Rule {
    Rule {
        method,
        path,
        access,
    }
}

const ADMIN: Access = Access::Role(Role::Admin);
const USER: Access = Access::Role(Role::User);

// `{name}` segments match any single non-empty path segment.
static POLICY: &[Rule] = &[
    rule("POST", "/api/authenticate/register", Access::Public),
    rule("POST", "/api/authenticate/login", Access::Public),
    rule("POST", "/api/authenticate/register-admin", ADMIN),
    rule("GET", "/api/book", Access::Public),
    rule("GET", "/api/book/{id}", Access::Public),
    rule("POST", "/api/book", ADMIN),
    rule("PUT", "/api/book/{id}", ADMIN),
    rule("DELETE", "/api/book/{id}", ADMIN),
    rule("GET", "/api/category", Access::Public),
    rule("POST", "/api/category", ADMIN),
    rule("GET", "/api/category/{id}", ADMIN),
    rule("PUT", "/api/category/{id}", ADMIN),
    rule("DELETE", "/api/category/{id}", ADMIN),
    rule("GET", "/api/userbook", USER),
    rule("POST", "/api/userbook/{bookId}", USER),
    rule("DELETE", "/api/userbook/{bookId}", USER),
];

fn path_matches(pattern: &str, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                let wildcard = expected.starts_with('{') && expected.ends_with('}');
                if wildcard {
                    if actual.is_empty() {
                        return false;
                    }
                } else if expected != actual {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// Look up the access requirement for a request.
///
/// Requests that match no rule are public so that the router can answer
/// them with 404 or 405.
pub fn required_access(method: &str, path: &str) -> Access {
    POLICY
        .iter()
        .find(|rule| rule.method.eq_ignore_ascii_case(method) && path_matches(rule.path, path))
        .map(|rule| rule.access)
        .unwrap_or(Access::Public)
}
