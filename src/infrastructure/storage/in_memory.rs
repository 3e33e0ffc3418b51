//! In-memory store shared by the in-memory repositories
//!
//! Useful for testing and development. Data is lost when the process
//! terminates. Rows are kept in insertion order, and the same uniqueness and
//! reference rules as the relational schema are enforced by the repositories.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{DomainError, Membership, StorageHealthCheck, Team, User};

/// The full table set. A repository holding the write guard sees a
/// consistent snapshot, so every multi-step operation that validates before
/// mutating is atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    pub memberships: Vec<Membership>,
}

/// Cheaply cloneable handle to one shared set of tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[async_trait]
impl StorageHealthCheck for InMemoryDatabase {
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[tokio::test]
    async fn test_clones_share_tables() {
        let db = InMemoryDatabase::new();
        let other = db.clone();

        db.write()
            .await
            .users
            .push(User::new(UserId::generate(), "a@b.com", "ab", "hash"));

        assert_eq!(other.read().await.users.len(), 1);
        assert!(other.ping().await.is_ok());
    }
}
