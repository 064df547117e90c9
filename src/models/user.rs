use serde::Serialize;
use sqlx::FromRow;

/// A registered account as stored in the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
}

/// The resolved identity behind a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_drops_password_hash() {
        let user = User {
            id: 7,
            email: "a@x.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
        };
        let current: CurrentUser = user.into();

        assert_eq!(current.id, 7);
        let json = serde_json::to_value(&current).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
