//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId};
use super::membership::Membership;
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for teams and their memberships
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// List teams in insertion order
    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Team>, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;

    async fn update(&self, team: &Team) -> Result<Team, DomainError>;

    /// Insert the team and its founding membership in one atomic unit.
    /// On failure neither row is stored.
    async fn create_with_owner(&self, team: Team, owner: Membership)
        -> Result<Team, DomainError>;

    /// Remove every membership of the team, then the team, atomically.
    /// Returns false when the team did not exist.
    async fn delete_with_memberships(&self, id: &TeamId) -> Result<bool, DomainError>;

    /// Insert a membership. A duplicate (user, team) pair yields `Conflict`.
    async fn add_membership(&self, membership: Membership) -> Result<Membership, DomainError>;

    /// Returns false when no matching membership existed
    async fn remove_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError>;

    async fn list_memberships(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError>;
}
