//! In-memory user repository implementation

use async_trait::async_trait;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryDatabase, Tables};

/// In-memory implementation of UserRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    db: InMemoryDatabase,
}

impl InMemoryUserRepository {
    /// Create a repository over its own empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository sharing tables with other repositories
    pub fn with_database(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

fn check_unique(tables: &Tables, user: &User) -> Result<(), DomainError> {
    let others = tables.users.iter().filter(|u| u.id() != user.id());

    for other in others {
        if other.email() == user.email() {
            return Err(DomainError::conflict(format!(
                "User with email {} already exists!",
                user.email()
            )));
        }

        if other.name() == user.name() {
            return Err(DomainError::conflict(format!(
                "User with username {} already exists!",
                user.name()
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables.users.iter().find(|u| u.id() == id).cloned())
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(u.id()))
            .cloned()
            .collect())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.db.write().await;

        if tables.users.iter().any(|u| u.id() == user.id()) {
            return Err(DomainError::conflict(format!(
                "User with id {} already exists!",
                user.id()
            )));
        }

        check_unique(&tables, &user)?;

        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.db.write().await;

        check_unique(&tables, user)?;

        let Some(stored) = tables.users.iter_mut().find(|u| u.id() == user.id()) else {
            return Err(DomainError::not_found(format!(
                "User with id {} was not found!",
                user.id()
            )));
        };

        *stored = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        let Some(position) = tables.users.iter().position(|u| u.id() == id) else {
            return Ok(false);
        };

        tables.memberships.retain(|m| m.user_id() != id);
        tables.users.remove(position);

        Ok(true)
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .users
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.db.read().await.users.len())
    }
}
