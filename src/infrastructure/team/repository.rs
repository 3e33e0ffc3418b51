//! In-memory team repository implementation

use async_trait::async_trait;

use crate::domain::team::{Membership, Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryDatabase, Tables};

use super::service::team_not_found;

/// In-memory implementation of TeamRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    db: InMemoryDatabase,
}

impl InMemoryTeamRepository {
    /// Create a repository over its own empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository sharing tables with other repositories
    pub fn with_database(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

/// Reference and uniqueness checks for a membership about to be inserted.
/// `pending_team` is a team written in the same unit of work.
fn check_membership(
    tables: &Tables,
    membership: &Membership,
    pending_team: Option<&TeamId>,
) -> Result<(), DomainError> {
    if !tables.users.iter().any(|u| u.id() == membership.user_id()) {
        return Err(DomainError::storage(format!(
            "membership references missing user {}",
            membership.user_id()
        )));
    }

    let team_known = pending_team == Some(membership.team_id())
        || tables.teams.iter().any(|t| t.id() == membership.team_id());

    if !team_known {
        return Err(DomainError::storage(format!(
            "membership references missing team {}",
            membership.team_id()
        )));
    }

    let duplicate = tables
        .memberships
        .iter()
        .any(|m| m.team_id() == membership.team_id() && m.user_id() == membership.user_id());

    if duplicate {
        return Err(DomainError::conflict(
            "User is already a member of this team!",
        ));
    }

    Ok(())
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables.teams.iter().find(|t| t.id() == id).cloned())
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Team>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .teams
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.db.read().await.teams.len())
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let mut tables = self.db.write().await;

        let Some(stored) = tables.teams.iter_mut().find(|t| t.id() == team.id()) else {
            return Err(team_not_found(team.id()));
        };

        *stored = team.clone();
        Ok(team.clone())
    }

    async fn create_with_owner(
        &self,
        team: Team,
        owner: Membership,
    ) -> Result<Team, DomainError> {
        let mut tables = self.db.write().await;

        if tables.teams.iter().any(|t| t.id() == team.id()) {
            return Err(DomainError::conflict(format!(
                "Team with id {} already exists!",
                team.id()
            )));
        }

        // Both rows are checked before either is written
        check_membership(&tables, &owner, Some(team.id()))?;

        tables.teams.push(team.clone());
        tables.memberships.push(owner);
        Ok(team)
    }

    async fn delete_with_memberships(&self, id: &TeamId) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        let Some(position) = tables.teams.iter().position(|t| t.id() == id) else {
            return Ok(false);
        };

        tables.memberships.retain(|m| m.team_id() != id);
        tables.teams.remove(position);

        Ok(true)
    }

    async fn add_membership(&self, membership: Membership) -> Result<Membership, DomainError> {
        let mut tables = self.db.write().await;

        check_membership(&tables, &membership, None)?;

        tables.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn remove_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;
        let before = tables.memberships.len();

        tables
            .memberships
            .retain(|m| !(m.team_id() == team_id && m.user_id() == user_id));

        Ok(tables.memberships.len() < before)
    }

    async fn list_memberships(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .memberships
            .iter()
            .filter(|m| m.team_id() == team_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::TeamRole;
    use crate::domain::user::{User, UserRepository};
    use crate::infrastructure::user::InMemoryUserRepository;

    async fn setup() -> (InMemoryTeamRepository, InMemoryDatabase, UserId) {
        let db = InMemoryDatabase::new();
        let users = InMemoryUserRepository::with_database(db.clone());
        let user = users
            .create(User::new(UserId::generate(), "a@b.com", "ab", "hash"))
            .await
            .unwrap();

        (InMemoryTeamRepository::with_database(db.clone()), db, *user.id())
    }

    #[tokio::test]
    async fn test_create_with_owner() {
        let (repo, _db, user_id) = setup().await;
        let team = Team::new(TeamId::generate(), "Core", "D");
        let team_id = *team.id();

        repo.create_with_owner(team, Membership::owner(team_id, user_id))
            .await
            .unwrap();

        let memberships = repo.list_memberships(&team_id).await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role(), TeamRole::ProjectManager);
        assert_eq!(memberships[0].user_id(), &user_id);
    }

    #[tokio::test]
    async fn test_create_with_owner_rolls_back_on_membership_failure() {
        let (repo, db, _user_id) = setup().await;
        let team = Team::new(TeamId::generate(), "Core", "");
        let team_id = *team.id();

        let result = repo
            .create_with_owner(team, Membership::owner(team_id, UserId::generate()))
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(repo.get(&team_id).await.unwrap().is_none());
        assert!(db.read().await.memberships.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_membership_conflicts() {
        let (repo, _db, user_id) = setup().await;
        let team = Team::new(TeamId::generate(), "Core", "");
        let team_id = *team.id();
        repo.create_with_owner(team, Membership::owner(team_id, user_id))
            .await
            .unwrap();

        let result = repo
            .add_membership(Membership::new(team_id, user_id, TeamRole::Developer))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(repo.list_memberships(&team_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_with_memberships() {
        let (repo, db, user_id) = setup().await;
        let keep = Team::new(TeamId::generate(), "Keep", "");
        let keep_id = *keep.id();
        let doomed = Team::new(TeamId::generate(), "Drop", "");
        let drop_id = *doomed.id();

        repo.create_with_owner(keep, Membership::owner(keep_id, user_id))
            .await
            .unwrap();
        repo.create_with_owner(doomed, Membership::owner(drop_id, user_id))
            .await
            .unwrap();

        assert!(repo.delete_with_memberships(&drop_id).await.unwrap());
        assert!(repo.get(&drop_id).await.unwrap().is_none());

        let tables = db.read().await;
        assert_eq!(tables.memberships.len(), 1);
        assert_eq!(tables.memberships[0].team_id(), &keep_id);
        drop(tables);

        assert!(!repo.delete_with_memberships(&drop_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_membership_reports_absence() {
        let (repo, _db, user_id) = setup().await;
        let team = Team::new(TeamId::generate(), "Core", "");
        let team_id = *team.id();
        repo.create_with_owner(team, Membership::owner(team_id, user_id))
            .await
            .unwrap();

        assert!(repo.remove_membership(&team_id, &user_id).await.unwrap());
        assert!(!repo.remove_membership(&team_id, &user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let (repo, _db, user_id) = setup().await;

        for i in 0..5 {
            let team = Team::new(TeamId::generate(), format!("Team {i}"), "");
            let team_id = *team.id();
            repo.create_with_owner(team, Membership::owner(team_id, user_id))
                .await
                .unwrap();
        }

        let page = repo.list(4, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name(), "Team 4");
        assert_eq!(repo.count().await.unwrap(), 5);
    }
}
