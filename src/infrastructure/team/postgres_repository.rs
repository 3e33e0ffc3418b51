//! PostgreSQL team repository implementation
//!
//! Team creation and deletion span the `teams` and `memberships` tables and
//! run inside a single transaction. Dropping an uncommitted transaction rolls
//! it back, so every early return below leaves the database untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::team::{Membership, MembershipId, Team, TeamId, TeamRepository, TeamRole};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::map_write_error;

use super::service::team_not_found;

const ALREADY_MEMBER: &str = "User is already a member of this team!";

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        Ok(row.as_ref().map(row_to_team))
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM teams
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        Ok(rows.iter().map(row_to_team).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count teams: {}", e)))?;

        Ok(count as usize)
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.name())
        .bind(team.description())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update team: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(team_not_found(team.id()));
        }

        Ok(team.clone())
    }

    async fn create_with_owner(
        &self,
        team: Team,
        owner: Membership,
    ) -> Result<Team, DomainError> {
        let mut tx = self.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.name())
        .bind(team.description())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                &format!("Team with id {} already exists!", team.id()),
                "Failed to create team",
            )
        })?;

        insert_membership(&mut tx, &owner).await?;

        commit(tx).await?;
        Ok(team)
    }

    async fn delete_with_memberships(&self, id: &TeamId) -> Result<bool, DomainError> {
        let mut tx = self.begin().await?;

        sqlx::query("DELETE FROM memberships WHERE team_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to delete team memberships: {}", e))
            })?;

        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        commit(tx).await?;
        Ok(true)
    }

    async fn add_membership(&self, membership: Membership) -> Result<Membership, DomainError> {
        let mut tx = self.begin().await?;
        insert_membership(&mut tx, &membership).await?;
        commit(tx).await?;

        Ok(membership)
    }

    async fn remove_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM memberships WHERE team_id = $1 AND user_id = $2")
            .bind(team_id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to remove membership: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_memberships(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, team_id, user_id, role, created_at
            FROM memberships
            WHERE team_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list memberships: {}", e)))?;

        rows.iter().map(row_to_membership).collect()
    }
}

async fn insert_membership(
    tx: &mut Transaction<'static, Postgres>,
    membership: &Membership,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO memberships (id, team_id, user_id, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        "#,
    )
    .bind(membership.id().as_uuid())
    .bind(membership.team_id().as_uuid())
    .bind(membership.user_id().as_uuid())
    .bind(membership.role().as_str())
    .bind(membership.created_at())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, ALREADY_MEMBER, "Failed to create membership"))?;

    Ok(())
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Team {
    let id: Uuid = row.get("id");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    Team::restore(
        TeamId::from(id),
        row.get("name"),
        row.get("description"),
        created_at,
        updated_at,
    )
}

fn row_to_membership(row: &sqlx::postgres::PgRow) -> Result<Membership, DomainError> {
    let id: Uuid = row.get("id");
    let team_id: Uuid = row.get("team_id");
    let user_id: Uuid = row.get("user_id");
    let role: String = row.get("role");

    let role = role
        .parse::<TeamRole>()
        .map_err(|_| DomainError::storage(format!("Unknown team role '{}' in database", role)))?;

    Ok(Membership::restore(
        MembershipId::from(id),
        TeamId::from(team_id),
        UserId::from(user_id),
        role,
        row.get("created_at"),
    ))
}
