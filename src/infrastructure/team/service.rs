//! Team service: team lifecycle and memberships

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::team::{
    validate_team_name, Membership, Team, TeamId, TeamMember, TeamRepository, TeamRole,
};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::{DomainError, Page, PageRequest, ValidationErrors};
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Request for creating a new team
#[derive(Debug, Clone, Default)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CreateTeamRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("name", validate_team_name(&self.name));
        errors.into_result()
    }
}

/// Partial update of a team. Empty or absent fields keep the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateTeamRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            errors.check("name", validate_team_name(name));
        }

        errors.into_result()
    }
}

/// Request for adding a user to a team
#[derive(Debug, Clone, Default)]
pub struct AddMembershipRequest {
    pub user_id: String,
    /// Defaults to developer when absent
    pub role: Option<String>,
}

impl AddMembershipRequest {
    /// Validate and resolve the typed user ID and role
    pub fn validate(&self) -> Result<(UserId, TeamRole), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let user_id = parse_member_id(&self.user_id, &mut errors);

        let role = match self.role.as_deref() {
            None => Some(TeamRole::default()),
            Some(role) => match role.parse::<TeamRole>() {
                Ok(role) => Some(role),
                Err(e) => {
                    errors.add("role", e.to_string());
                    None
                }
            },
        };

        match (user_id, role) {
            (Some(user_id), Some(role)) if errors.is_empty() => Ok((user_id, role)),
            _ => Err(errors),
        }
    }
}

/// Request for removing a user from a team
#[derive(Debug, Clone, Default)]
pub struct RemoveMembershipRequest {
    pub user_id: String,
}

impl RemoveMembershipRequest {
    pub fn validate(&self) -> Result<UserId, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match parse_member_id(&self.user_id, &mut errors) {
            Some(user_id) => Ok(user_id),
            None => Err(errors),
        }
    }
}

fn parse_member_id(value: &str, errors: &mut ValidationErrors) -> Option<UserId> {
    if value.is_empty() {
        errors.add("userId", "is required");
        return None;
    }

    match UserId::parse(value) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add("userId", "must be a valid UUID");
            None
        }
    }
}

pub(crate) fn team_not_found(id: &TeamId) -> DomainError {
    DomainError::not_found(format!("Team with id {} was not found!", id))
}

/// Team service for managing teams and their members
#[derive(Debug)]
pub struct TeamService<R: TeamRepository, U: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    users: Arc<UserService<U, H>>,
}

impl<R, U, H> TeamService<R, U, H>
where
    R: TeamRepository,
    U: UserRepository,
    H: PasswordHasher,
{
    pub fn new(repository: Arc<R>, users: Arc<UserService<U, H>>) -> Self {
        Self { repository, users }
    }

    /// Create a team together with a project manager membership for its
    /// creator, atomically
    pub async fn create(
        &self,
        creator_id: &str,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        let creator_id = UserId::parse(creator_id)?;
        request.validate()?;

        self.users.require(&creator_id).await?;

        let team = Team::new(
            TeamId::generate(),
            request.name,
            request.description.unwrap_or_default(),
        );
        let owner = Membership::owner(*team.id(), creator_id);

        info!(team_id = %team.id(), creator_id = %creator_id, "Creating team");

        self.repository.create_with_owner(team, owner).await
    }

    /// Get a team by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Team, DomainError> {
        let team_id = TeamId::parse(id)?;
        self.require(&team_id).await
    }

    async fn require(&self, id: &TeamId) -> Result<Team, DomainError> {
        debug!(team_id = %id, "Fetching team");

        self.repository
            .get(id)
            .await?
            .ok_or_else(|| team_not_found(id))
    }

    /// List teams in insertion order
    pub async fn list(&self, request: PageRequest) -> Result<Page<Team>, DomainError> {
        debug!(page = request.page(), size = request.size(), "Listing teams");

        let items = self
            .repository
            .list(request.offset(), request.limit())
            .await?;
        let total = self.repository.count().await?;

        Ok(Page::new(items, request, total))
    }

    /// Apply a partial update
    pub async fn update_by_id(
        &self,
        id: &str,
        request: UpdateTeamRequest,
    ) -> Result<Team, DomainError> {
        let team_id = TeamId::parse(id)?;
        let mut team = self.require(&team_id).await?;

        request.validate()?;

        if let Some(name) = request.name.filter(|n| !n.is_empty()) {
            team.set_name(name);
        }

        if let Some(description) = request.description.filter(|d| !d.is_empty()) {
            team.set_description(description);
        }

        info!(team_id = %team_id, "Updating team");

        self.repository.update(&team).await
    }

    /// Delete a team and all of its memberships, atomically
    pub async fn delete_by_id(&self, id: &str) -> Result<(), DomainError> {
        let team_id = TeamId::parse(id)?;
        self.require(&team_id).await?;

        info!(team_id = %team_id, "Deleting team");

        if !self.repository.delete_with_memberships(&team_id).await? {
            return Err(team_not_found(&team_id));
        }

        Ok(())
    }

    /// Add an existing user to an existing team.
    /// A duplicate (user, team) pair is rejected with `Conflict`.
    pub async fn add_membership(
        &self,
        team_id: &str,
        request: AddMembershipRequest,
    ) -> Result<Membership, DomainError> {
        let team_id = TeamId::parse(team_id)?;
        let (user_id, role) = request.validate()?;

        self.require(&team_id).await?;
        self.users.require(&user_id).await?;

        info!(team_id = %team_id, user_id = %user_id, role = %role, "Adding team member");

        self.repository
            .add_membership(Membership::new(team_id, user_id, role))
            .await
    }

    /// Remove a user from a team. Removing a user who is not a member is
    /// reported as `NotFound`.
    pub async fn remove_membership(
        &self,
        team_id: &str,
        request: RemoveMembershipRequest,
    ) -> Result<(), DomainError> {
        let team_id = TeamId::parse(team_id)?;
        let user_id = request.validate()?;

        self.require(&team_id).await?;
        self.users.require(&user_id).await?;

        info!(team_id = %team_id, user_id = %user_id, "Removing team member");

        if !self.repository.remove_membership(&team_id, &user_id).await? {
            return Err(DomainError::not_found(format!(
                "User with id {} is not a member of team {}!",
                user_id, team_id
            )));
        }

        Ok(())
    }

    /// Members of a team joined with their user records.
    ///
    /// Users are resolved with one bulk fetch, not one lookup per member.
    pub async fn list_members(&self, team_id: &str) -> Result<Vec<TeamMember>, DomainError> {
        let team_id = TeamId::parse(team_id)?;
        self.require(&team_id).await?;

        let memberships = self.repository.list_memberships(&team_id).await?;

        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let user_ids: Vec<UserId> = memberships
            .iter()
            .map(|m| *m.user_id())
            .filter(|id| seen.insert(*id))
            .collect();

        let users: HashMap<UserId, User> = self
            .users
            .get_many(&user_ids)
            .await?
            .into_iter()
            .map(|u| (*u.id(), u))
            .collect();

        let members = memberships
            .into_iter()
            .filter_map(|membership| {
                let Some(user) = users.get(membership.user_id()) else {
                    warn!(
                        team_id = %team_id,
                        user_id = %membership.user_id(),
                        "Skipping membership of unknown user"
                    );
                    return None;
                };

                Some(TeamMember {
                    user_id: *user.id(),
                    name: user.name().to_string(),
                    email: user.email().to_string(),
                    role: membership.role(),
                })
            })
            .collect();

        Ok(members)
    }
}
