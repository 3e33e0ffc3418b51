//! User service: account lifecycle and listing

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    validate_email, validate_password, validate_user_name, User, UserId, UserRepository,
};
use crate::domain::{DomainError, Page, PageRequest, ValidationErrors};

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("email", validate_email(&self.email));
        errors.check("username", validate_user_name(&self.name));
        errors.check("password", validate_password(&self.password));
        errors.into_result()
    }
}

/// Partial update of a user. Empty or absent fields keep the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            errors.check("username", validate_user_name(name));
        }

        errors.into_result()
    }
}

pub(crate) fn user_not_found(id: &UserId) -> DomainError {
    DomainError::not_found(format!("User with id {} was not found!", id))
}

/// User service for account management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new standard user with a hashed password
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        request.validate()?;

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(UserId::generate(), request.email, request.name, password_hash);

        info!(user_id = %user.id(), "Creating user");

        self.repository.create(user).await
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<User, DomainError> {
        let user_id = UserId::parse(id)?;
        self.require(&user_id).await
    }

    /// Fetch a user that must exist
    pub async fn require(&self, id: &UserId) -> Result<User, DomainError> {
        debug!(user_id = %id, "Fetching user");

        self.repository
            .get(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    /// Fetch several users with a single repository call
    pub async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        self.repository.get_many(ids).await
    }

    /// Apply a partial update
    pub async fn update_by_id(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        let user_id = UserId::parse(id)?;
        let mut user = self.require(&user_id).await?;

        request.validate()?;

        if let Some(name) = request.name.filter(|n| !n.is_empty()) {
            user.set_name(name);
        }

        info!(user_id = %user_id, "Updating user");

        self.repository.update(&user).await
    }

    /// Delete an existing user
    pub async fn delete_by_id(&self, id: &str) -> Result<(), DomainError> {
        let user_id = UserId::parse(id)?;
        self.require(&user_id).await?;

        info!(user_id = %user_id, "Deleting user");

        if !self.repository.delete(&user_id).await? {
            return Err(user_not_found(&user_id));
        }

        Ok(())
    }

    /// List users in insertion order
    pub async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError> {
        debug!(page = request.page(), size = request.size(), "Listing users");

        let items = self
            .repository
            .list(request.offset(), request.limit())
            .await?;
        let total = self.repository.count().await?;

        Ok(Page::new(items, request, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserRepository, UserRole};
    use crate::domain::ErrorKind;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        UserService::new(repository, hasher)
    }

    fn make_request(email: &str, name: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        }
    }

    #[derive(Debug)]
    struct FailingHasher;

    impl PasswordHasher for FailingHasher {
        fn hash(&self, _password: &str) -> Result<String, DomainError> {
            Err(DomainError::internal("hasher unavailable"))
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap();

        assert_eq!(user.email(), "a@b.com");
        assert_eq!(user.name(), "ab");
        assert_eq!(user.role(), UserRole::Standard);
        assert_ne!(user.password_hash(), "password1");
        assert!(Argon2Hasher::new().verify("password1", user.password_hash()));
    }

    #[tokio::test]
    async fn test_create_user_collects_every_violation() {
        let service = create_service();

        let err = service
            .create(make_request("not-an-email", "a", "short"))
            .await
            .unwrap_err();

        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.has_field("email"));
        assert!(errors.has_field("username"));
        assert!(errors.has_field("password"));
    }

    #[tokio::test]
    async fn test_create_user_missing_fields() {
        let service = create_service();

        let err = service
            .create(CreateUserRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.public_message().contains("email: is required"));
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let service = create_service();

        service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap();
        let err = service
            .create(make_request("a@b.com", "cd", "password1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_hash_failure_is_internal() {
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(FailingHasher),
        );

        let err = service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_internal() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(DomainError::storage("connection reset")));

        let service = UserService::new(Arc::new(repository), Arc::new(Argon2Hasher::new()));

        let err = service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), "Unexpected error occurred!");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let service = create_service();
        let id = UserId::generate();

        let err = service.get_by_id(&id.to_string()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.public_message(),
            format!("User with id {} was not found!", id)
        );
    }

    #[tokio::test]
    async fn test_get_by_id_invalid_uuid() {
        let service = create_service();

        let err = service.get_by_id("123").await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidId { .. }));
    }

    #[tokio::test]
    async fn test_update_name() {
        let service = create_service();
        let user = service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap();

        let updated = service
            .update_by_id(
                &user.id().to_string(),
                UpdateUserRequest {
                    name: Some("abc".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "abc");
        assert_eq!(updated.email(), "a@b.com");
    }

    #[tokio::test]
    async fn test_update_with_empty_name_keeps_value() {
        let service = create_service();
        let user = service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap();
        let id = user.id().to_string();

        let updated = service
            .update_by_id(&id, UpdateUserRequest { name: Some(String::new()) })
            .await
            .unwrap();
        assert_eq!(updated.name(), "ab");

        let updated = service
            .update_by_id(&id, UpdateUserRequest::default())
            .await
            .unwrap();
        assert_eq!(updated.name(), "ab");
    }

    #[tokio::test]
    async fn test_update_short_name_rejected() {
        let service = create_service();
        let user = service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap();

        let err = service
            .update_by_id(
                &user.id().to_string(),
                UpdateUserRequest {
                    name: Some("x".to_string()),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = create_service();

        let err = service
            .update_by_id(&UserId::generate().to_string(), UpdateUserRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = create_service();
        let user = service
            .create(make_request("a@b.com", "ab", "password1"))
            .await
            .unwrap();
        let id = user.id().to_string();

        service.delete_by_id(&id).await.unwrap();

        assert_eq!(
            service.get_by_id(&id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            service.delete_by_id(&id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let service = create_service();

        for i in 0..5 {
            service
                .create(make_request(&format!("u{i}@b.com"), &format!("user{i}"), "password1"))
                .await
                .unwrap();
        }

        let page = service
            .list(PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);

        let page = service
            .list(PageRequest::new(Some(3), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name(), "user4");
        assert_eq!(page.page, 3);
        assert_eq!(page.size, 2);
    }
}
