//! User entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// User identifier, assigned by the service layer before persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a client
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id("Invalid UUID!"))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account-level role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Standard,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Standard => "standard",
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "standard" => Ok(Self::Standard),
            other => Err(DomainError::storage(format!("Unknown user role '{}'", other))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    name: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    role: UserRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new standard user
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: email.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            role: UserRole::Standard,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored values
    pub fn restore(
        id: UserId,
        email: String,
        name: String,
        password_hash: String,
        role: UserRole,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            role,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_standard() {
        let user = User::new(UserId::generate(), "a@b.com", "ab", "hash");

        assert_eq!(user.role(), UserRole::Standard);
        assert_eq!(user.email(), "a@b.com");
        assert_eq!(user.name(), "ab");
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_set_name_touches() {
        let mut user = User::new(UserId::generate(), "a@b.com", "ab", "hash");
        let before = user.updated_at();

        user.set_name("abc");

        assert_eq!(user.name(), "abc");
        assert!(user.updated_at() >= before);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(UserId::generate(), "a@b.com", "ab", "secret-hash");
        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_user_id_parse() {
        let id = UserId::generate();
        assert_eq!(UserId::parse(&id.to_string()).unwrap(), id);

        let err = UserId::parse("not-a-uuid").unwrap_err();
        assert_eq!(err.public_message(), "Invalid UUID!");
    }

    #[test]
    fn test_user_role_round_trip() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(UserRole::Standard.to_string(), "standard");
        assert!("root".parse::<UserRole>().is_err());
    }
}
