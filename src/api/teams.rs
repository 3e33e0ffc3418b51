//! Team and membership endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Pagination, Query};
use crate::domain::{DomainError, Membership, Page, Team, TeamMember};
use crate::infrastructure::team::{
    AddMembershipRequest, CreateTeamRequest, RemoveMembershipRequest, UpdateTeamRequest,
};

/// Query string of `POST /teams`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorQuery {
    pub creator_id: Option<String>,
}

/// Request to create a new team
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateTeamApiRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Request to update a team
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTeamApiRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request to add a member to a team
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddMemberApiRequest {
    pub user_id: String,
    pub role: Option<String>,
}

/// Request to remove a member from a team
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoveMemberApiRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().to_string(),
            name: team.name().to_string(),
            description: team.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&TeamMember> for MemberResponse {
    fn from(member: &TeamMember) -> Self {
        Self {
            user_id: member.user_id.to_string(),
            name: member.name.clone(),
            email: member.email.clone(),
            role: member.role.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    pub role: String,
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            id: membership.id().to_string(),
            team_id: membership.team_id().to_string(),
            user_id: membership.user_id().to_string(),
            role: membership.role().as_str().to_string(),
        }
    }
}

pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{team_id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route(
            "/teams/{team_id}/members",
            get(list_members).post(add_member).delete(remove_member),
        )
}

/// GET /teams
pub async fn list_teams(
    State(state): State<AppState>,
    Pagination(request): Pagination,
) -> Result<Json<Page<TeamResponse>>, ApiError> {
    debug!(page = request.page(), size = request.size(), "Listing teams");

    let page = state.team_service.list(request).await?;

    Ok(Json(page.map(|team| TeamResponse::from(&team))))
}

/// POST /teams?creatorId=...
pub async fn create_team(
    State(state): State<AppState>,
    Query(query): Query<CreatorQuery>,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let creator_id = query
        .creator_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DomainError::validation("creatorId", "is required"))?;

    debug!(creator_id = %creator_id, name = %request.name, "Creating team");

    let service_request = CreateTeamRequest {
        name: request.name,
        description: request.description,
    };

    let team = state
        .team_service
        .create(&creator_id, service_request)
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// GET /teams/{team_id}
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<TeamResponse>, ApiError> {
    debug!(team_id = %team_id, "Getting team");

    let team = state.team_service.get(&team_id).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// PUT /teams/{team_id}
pub async fn update_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<UpdateTeamApiRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    debug!(team_id = %team_id, "Updating team");

    let service_request = UpdateTeamRequest {
        name: request.name,
        description: request.description,
    };

    let team = state.team_service.update(&team_id, service_request).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// DELETE /teams/{team_id}
pub async fn delete_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(team_id = %team_id, "Deleting team");

    state.team_service.delete(&team_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /teams/{team_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    debug!(team_id = %team_id, "Listing team members");

    let members = state.team_service.list_members(&team_id).await?;

    Ok(Json(members.iter().map(MemberResponse::from).collect()))
}

/// POST /teams/{team_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<AddMemberApiRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>), ApiError> {
    debug!(team_id = %team_id, user_id = %request.user_id, "Adding team member");

    let service_request = AddMembershipRequest {
        user_id: request.user_id,
        role: request.role,
    };

    let membership = state
        .team_service
        .add_member(&team_id, service_request)
        .await?;

    Ok((StatusCode::CREATED, Json(MembershipResponse::from(&membership))))
}

/// DELETE /teams/{team_id}/members
pub async fn remove_member(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<RemoveMemberApiRequest>,
) -> Result<StatusCode, ApiError> {
    debug!(team_id = %team_id, user_id = %request.user_id, "Removing team member");

    let service_request = RemoveMembershipRequest {
        user_id: request.user_id,
    };

    state
        .team_service
        .remove_member(&team_id, service_request)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TeamId, TeamRole, UserId};

    #[test]
    fn test_member_response_uses_camel_case() {
        let member = TeamMember {
            user_id: UserId::generate(),
            name: "ab".to_string(),
            email: "a@b.com".to_string(),
            role: TeamRole::ProjectManager,
        };

        let json = serde_json::to_value(MemberResponse::from(&member)).unwrap();

        assert_eq!(json["userId"], member.user_id.to_string());
        assert_eq!(json["role"], "project_manager");
    }

    #[test]
    fn test_membership_response() {
        let membership = Membership::new(TeamId::generate(), UserId::generate(), TeamRole::Developer);

        let response = MembershipResponse::from(&membership);

        assert_eq!(response.team_id, membership.team_id().to_string());
        assert_eq!(response.role, "developer");
    }

    #[test]
    fn test_add_member_request_role_optional() {
        let request: AddMemberApiRequest =
            serde_json::from_str(r#"{"userId":"5f0c3d4e-0000-4000-8000-000000000000"}"#).unwrap();

        assert!(request.role.is_none());
        assert!(!request.user_id.is_empty());
    }
}
