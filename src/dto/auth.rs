use serde::Serialize;

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenDto {
    pub token: String,
}
