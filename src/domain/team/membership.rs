//! Team membership: the link between a user and a team, with a role

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::TeamId;
use super::validation::TeamValidationError;
use crate::domain::user::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(Uuid);

impl MembershipId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for MembershipId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a user within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Given to the creator of a team
    ProjectManager,
    #[default]
    Developer,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectManager => "project_manager",
            Self::Developer => "developer",
        }
    }
}

impl FromStr for TeamRole {
    type Err = TeamValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project_manager" => Ok(Self::ProjectManager),
            "developer" => Ok(Self::Developer),
            _ => Err(TeamValidationError::InvalidRole),
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's membership in a team. The (user, team) pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    id: MembershipId,
    team_id: TeamId,
    user_id: UserId,
    role: TeamRole,
    created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(team_id: TeamId, user_id: UserId, role: TeamRole) -> Self {
        Self {
            id: MembershipId::generate(),
            team_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }

    /// The founding membership of a freshly created team
    pub fn owner(team_id: TeamId, user_id: UserId) -> Self {
        Self::new(team_id, user_id, TeamRole::ProjectManager)
    }

    pub fn restore(
        id: MembershipId,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            team_id,
            user_id,
            role,
            created_at,
        }
    }

    pub fn id(&self) -> &MembershipId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> TeamRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Member listing entry: a membership joined with its user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: TeamRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_role_parse() {
        assert_eq!("project_manager".parse::<TeamRole>(), Ok(TeamRole::ProjectManager));
        assert_eq!("developer".parse::<TeamRole>(), Ok(TeamRole::Developer));
        assert_eq!("owner".parse::<TeamRole>(), Err(TeamValidationError::InvalidRole));
        assert_eq!("Developer".parse::<TeamRole>(), Err(TeamValidationError::InvalidRole));
    }

    #[test]
    fn test_team_role_default_and_serde() {
        assert_eq!(TeamRole::default(), TeamRole::Developer);
        assert_eq!(
            serde_json::to_string(&TeamRole::ProjectManager).unwrap(),
            "\"project_manager\""
        );
    }

    #[test]
    fn test_owner_membership() {
        let team_id = TeamId::generate();
        let user_id = UserId::generate();
        let membership = Membership::owner(team_id, user_id);

        assert_eq!(membership.role(), TeamRole::ProjectManager);
        assert_eq!(membership.team_id(), &team_id);
        assert_eq!(membership.user_id(), &user_id);
    }
}
