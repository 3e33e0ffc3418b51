//! Migrate command - applies or reverts schema migrations

use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{connect_pool, PostgresMigrator};

#[derive(Debug, Clone, Args)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pool = connect_pool(&config.database.to_postgres_config()).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.revert {
        match migrator.revert_latest().await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migration to revert"),
        }
    } else {
        let applied = migrator.run_all().await?;
        let version = migrator.current_version().await?;
        info!(applied, version = ?version, "Migrations applied");
    }

    Ok(())
}
