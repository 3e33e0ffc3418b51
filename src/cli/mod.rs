//! Command line entry points
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply or revert schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Teamwork API - users, teams and team memberships
#[derive(Debug, Parser)]
#[command(name = "teamwork-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending schema migrations
    Migrate(migrate::MigrateArgs),
}

/// Load `.env`, configuration and the global subscriber
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["teamwork-api", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["teamwork-api", "migrate", "--revert"]).unwrap();

        match cli.command {
            Command::Migrate(args) => assert!(args.revert),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["teamwork-api"]).is_err());
    }
}
