//! User endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Pagination};
use crate::domain::{Page, User};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Request to create a new user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserApiRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Request to update a user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserApiRequest {
    pub username: Option<String>,
}

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            username: user.name().to_string(),
        }
    }
}

pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Pagination(request): Pagination,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    debug!(page = request.page(), size = request.size(), "Listing users");

    let page = state.user_service.list(request).await?;

    Ok(Json(page.map(|user| UserResponse::from(&user))))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(email = %request.email, username = %request.username, "Creating user");

    let service_request = CreateUserRequest {
        email: request.email,
        name: request.username,
        password: request.password,
    };

    let user = state.user_service.create(service_request).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Getting user");

    let user = state.user_service.get(&user_id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Updating user");

    let service_request = UpdateUserRequest {
        name: request.username,
    };

    let user = state.user_service.update(&user_id, service_request).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(user_id = %user_id, "Deleting user");

    state.user_service.delete(&user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[test]
    fn test_user_response_hides_password() {
        let user = User::new(UserId::generate(), "a@b.com", "ab", "$argon2id$secret");

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["username"], "ab");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_create_request_missing_fields_default_to_empty() {
        let request: CreateUserApiRequest =
            serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();

        assert_eq!(request.email, "a@b.com");
        assert!(request.username.is_empty());
        assert!(request.password.is_empty());
    }
}
