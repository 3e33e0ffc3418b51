//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL migrator tracking applied versions in a `_migrations` table
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Applies a single migration and records it, in one transaction.
    /// Returns false when it was already applied.
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(version = migration.version, description = migration.description, "Applied migration");
        Ok(true)
    }

    /// Reverts a single migration. Returns false when it was not applied.
    pub async fn revert_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::raw_sql(migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit revert: {}", e)))?;

        info!(version = migration.version, "Reverted migration");
        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE success = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }

    /// Applies every pending migration in version order.
    /// Returns how many were applied.
    pub async fn run_all(&self) -> Result<usize, DomainError> {
        let mut applied = 0;

        for migration in schema_migrations() {
            if self.run_migration(&migration).await? {
                applied += 1;
            }
        }

        Ok(applied)
    }

    /// Reverts the most recently applied migration, if any
    pub async fn revert_latest(&self) -> Result<Option<i64>, DomainError> {
        let Some(version) = self.current_version().await? else {
            return Ok(None);
        };

        let migration = schema_migrations()
            .into_iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!("Unknown applied migration version {}", version))
            })?;

        self.revert_migration(&migration).await?;
        Ok(Some(version))
    }
}

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    /// SQL to run when applying the migration
    pub up: &'static str,
    /// SQL to run when reverting the migration
    pub down: &'static str,
}

impl Migration {
    pub const fn new(
        version: i64,
        description: &'static str,
        up: &'static str,
        down: &'static str,
    ) -> Self {
        Self {
            version,
            description,
            up,
            down,
        }
    }
}

/// The application schema, in ascending version order.
///
/// Foreign keys carry no ON DELETE action; dependent rows are removed by the
/// repositories inside their own transactions.
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email VARCHAR(254) NOT NULL,
                name VARCHAR(50) NOT NULL,
                password_hash VARCHAR(150) NOT NULL,
                role VARCHAR(20) NOT NULL DEFAULT 'standard'
                    CHECK (role IN ('admin', 'standard')),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_email_key UNIQUE (email),
                CONSTRAINT users_name_key UNIQUE (name)
            );
            CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS users;
            "#,
        ),
        Migration::new(
            2,
            "Create teams table",
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id UUID PRIMARY KEY,
                name VARCHAR(50) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_teams_created_at ON teams(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS teams;
            "#,
        ),
        Migration::new(
            3,
            "Create memberships table",
            r#"
            CREATE TABLE IF NOT EXISTS memberships (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id),
                team_id UUID NOT NULL REFERENCES teams(id),
                role VARCHAR(20) NOT NULL DEFAULT 'developer'
                    CHECK (role IN ('project_manager', 'developer')),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT memberships_user_team_key UNIQUE (user_id, team_id)
            );
            CREATE INDEX IF NOT EXISTS idx_memberships_user_id ON memberships(user_id);
            CREATE INDEX IF NOT EXISTS idx_memberships_team_id ON memberships(team_id);
            "#,
            r#"
            DROP TABLE IF EXISTS memberships;
            "#,
        ),
    ]
}

/// Runs all pending schema migrations
pub async fn run_schema_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    PostgresMigrator::new(pool.clone()).run_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_migrations_order() {
        let migrations = schema_migrations();

        assert_eq!(migrations.len(), 3);

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_schema_migrations_content() {
        for migration in schema_migrations() {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.trim().is_empty());
            assert!(!migration.down.trim().is_empty());
        }
    }

    #[test]
    fn test_membership_pair_is_unique_without_cascade() {
        let memberships = &schema_migrations()[2];

        assert!(memberships.up.contains("UNIQUE (user_id, team_id)"));
        assert!(!memberships.up.contains("ON DELETE"));
    }
}
