//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserRepository, UserRole};
use crate::domain::DomainError;
use crate::infrastructure::storage::violated_unique_constraint;

const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ids.iter().map(UserId::as_uuid).collect();

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1) ORDER BY created_at, id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.name())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_user_write_error(e, &user, "Failed to create user"))?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, password_hash = $4, role = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.name())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_user_write_error(e, user, "Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User with id {} was not found!",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM memberships WHERE user_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to delete user memberships: {}", e))
            })?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Ok(false);
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(true)
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn map_user_write_error(error: sqlx::Error, user: &User, context: &str) -> DomainError {
    violated_unique_constraint(&error)
        .and_then(|constraint| user_conflict(constraint, user))
        .unwrap_or_else(|| DomainError::storage(format!("{}: {}", context, error)))
}

/// Conflict for the user-facing unique columns. Any other constraint is a
/// storage failure.
fn user_conflict(constraint: &str, user: &User) -> Option<DomainError> {
    match constraint {
        "users_email_key" => Some(DomainError::conflict(format!(
            "User with email {} already exists!",
            user.email()
        ))),
        "users_name_key" => Some(DomainError::conflict(format!(
            "User with username {} already exists!",
            user.name()
        ))),
        _ => None,
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: Uuid = row.get("id");
    let role: String = row.get("role");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    Ok(User::restore(
        UserId::from(id),
        row.get("email"),
        row.get("name"),
        row.get("password_hash"),
        role.parse::<UserRole>()?,
        created_at,
        updated_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    fn user() -> User {
        User::new(UserId::generate(), "a@b.com", "ab", "$argon2id$secret")
    }

    #[test]
    fn test_email_constraint_is_conflict() {
        let err = user_conflict("users_email_key", &user()).unwrap();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.public_message().contains("a@b.com"));
    }

    #[test]
    fn test_name_constraint_is_conflict() {
        let err = user_conflict("users_name_key", &user()).unwrap();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.public_message().contains("username ab"));
    }

    #[test]
    fn test_other_constraint_is_not_a_user_conflict() {
        assert!(user_conflict("users_pkey", &user()).is_none());
        assert!(user_conflict("memberships_user_team_key", &user()).is_none());
    }
}
