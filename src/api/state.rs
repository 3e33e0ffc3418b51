//! Application state for shared services

use std::sync::Arc;

use crate::domain::team::{Membership, Team, TeamMember, TeamRepository};
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, Page, PageRequest, StorageHealthCheck};
use crate::infrastructure::team::{
    AddMembershipRequest, CreateTeamRequest, RemoveMembershipRequest, TeamService,
    UpdateTeamRequest,
};
use crate::infrastructure::user::{
    CreateUserRequest, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub team_service: Arc<dyn TeamServiceTrait>,
    pub storage: Arc<dyn StorageHealthCheck>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn get(&self, id: &str) -> Result<User, DomainError>;
    async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError>;
    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Trait for team service operations
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync {
    async fn create(
        &self,
        creator_id: &str,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError>;
    async fn get(&self, id: &str) -> Result<Team, DomainError>;
    async fn list(&self, request: PageRequest) -> Result<Page<Team>, DomainError>;
    async fn update(&self, id: &str, request: UpdateTeamRequest) -> Result<Team, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn add_member(
        &self,
        team_id: &str,
        request: AddMembershipRequest,
    ) -> Result<Membership, DomainError>;
    async fn remove_member(
        &self,
        team_id: &str,
        request: RemoveMembershipRequest,
    ) -> Result<(), DomainError>;
    async fn list_members(&self, team_id: &str) -> Result<Vec<TeamMember>, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn get(&self, id: &str) -> Result<User, DomainError> {
        UserService::get_by_id(self, id).await
    }

    async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError> {
        UserService::list(self, request).await
    }

    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        UserService::update_by_id(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        UserService::delete_by_id(self, id).await
    }
}

#[async_trait::async_trait]
impl<R, U, H> TeamServiceTrait for TeamService<R, U, H>
where
    R: TeamRepository + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(
        &self,
        creator_id: &str,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        TeamService::create(self, creator_id, request).await
    }

    async fn get(&self, id: &str) -> Result<Team, DomainError> {
        TeamService::get_by_id(self, id).await
    }

    async fn list(&self, request: PageRequest) -> Result<Page<Team>, DomainError> {
        TeamService::list(self, request).await
    }

    async fn update(&self, id: &str, request: UpdateTeamRequest) -> Result<Team, DomainError> {
        TeamService::update_by_id(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        TeamService::delete_by_id(self, id).await
    }

    async fn add_member(
        &self,
        team_id: &str,
        request: AddMembershipRequest,
    ) -> Result<Membership, DomainError> {
        TeamService::add_membership(self, team_id, request).await
    }

    async fn remove_member(
        &self,
        team_id: &str,
        request: RemoveMembershipRequest,
    ) -> Result<(), DomainError> {
        TeamService::remove_membership(self, team_id, request).await
    }

    async fn list_members(&self, team_id: &str) -> Result<Vec<TeamMember>, DomainError> {
        TeamService::list_members(self, team_id).await
    }
}

impl AppState {
    /// Wire services over a pair of repositories sharing one hasher
    pub fn from_repositories<U, T, H>(
        users: Arc<U>,
        teams: Arc<T>,
        hasher: Arc<H>,
        storage: Arc<dyn StorageHealthCheck>,
    ) -> Self
    where
        U: UserRepository + 'static,
        T: TeamRepository + 'static,
        H: PasswordHasher + 'static,
    {
        let user_service = Arc::new(UserService::new(users, hasher));
        let team_service = TeamService::new(teams, Arc::clone(&user_service));

        Self {
            user_service,
            team_service: Arc::new(team_service),
            storage,
        }
    }
}
