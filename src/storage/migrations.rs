//! Schema migrations.
//!
//! Scripts are read at runtime from a directory of `<version>_<name>.sql`
//! files and applied in version order by the sqlx migrator.

use std::collections::HashSet;
use std::path::Path;

use sqlx::{
    migrate::{Migrate, Migrator},
    Connection, PgConnection,
};

use super::error::StorageResult;

/// What a migration run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Number of scripts applied
    Applied(usize),
    /// Schema was already up to date
    NoChange,
}

/// Apply pending migrations from `dir` to the database at `url`
pub async fn run_migrations(url: &str, dir: impl AsRef<Path>) -> StorageResult<MigrationOutcome> {
    let migrator = Migrator::new(dir.as_ref().to_path_buf()).await?;
    let mut conn = PgConnection::connect(url).await?;

    conn.ensure_migrations_table().await?;
    let applied: HashSet<i64> = conn
        .list_applied_migrations()
        .await?
        .into_iter()
        .map(|migration| migration.version)
        .collect();

    let pending = migrator
        .iter()
        .filter(|migration| !migration.migration_type.is_down_migration())
        .filter(|migration| !applied.contains(&migration.version))
        .count();

    if pending == 0 {
        conn.close().await?;
        return Ok(MigrationOutcome::NoChange);
    }

    migrator.run(&mut conn).await?;
    conn.close().await?;

    Ok(MigrationOutcome::Applied(pending))
}
