//! Storage infrastructure - backing stores shared by the repositories

mod in_memory;
pub mod migrations;
mod postgres;

pub use in_memory::{InMemoryDatabase, Tables};
pub use migrations::{run_schema_migrations, schema_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig, PostgresHealthCheck};
pub(crate) use postgres::{map_write_error, violated_unique_constraint};
