pub mod extractors;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

pub use extractors::bearer_token;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for a user login request.
///
/// Fields are taken as given; a malformed email simply fails to match an account.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address for the new account; uniqueness is the only rule.
    pub email: String,
    pub password: String,
}

/// Response of a successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i32,
}

/// Response of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
