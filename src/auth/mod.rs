//! Authentication primitives: password hashing, bearer tokens and the
//! per-route authorization gate.

pub mod middleware;
pub mod password;
pub mod policy;
pub mod token;

pub use middleware::authorize;
pub use token::{Claims, TokenError, TokenService};
