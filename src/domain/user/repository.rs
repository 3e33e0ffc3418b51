//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Fetch every user whose ID is in `ids` with a single lookup.
    /// Unknown IDs are absent from the result.
    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Persist a new user. Duplicate email or name yields `Conflict`.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user together with all of their memberships.
    ///
    /// The cascade is part of the contract: a deleted user never lingers as a
    /// team member, so implementations remove the memberships and the user in
    /// one atomic step. Returns false when the user did not exist.
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// List users in insertion order
    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
