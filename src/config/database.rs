//! Database configuration module for the catalog service.
//!
//! This module handles the `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the on-disk schema always matches the Rust structs. Creation uses `IF NOT EXISTS`
//! because the database file outlives the process.

use crate::entities::Bean;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Default database location, created on first connect.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/all_the_beans.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database at `database_url`.
///
/// The returned handle is owned by the caller and passed explicitly to every
/// data-access function; it is closed at shutdown.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url)
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }

    debug!("Connecting to database at {}", database_url);
    let db = Database::connect(database_url).await?;
    info!("Database connection opened");
    Ok(db)
}

/// File path of a `sqlite://` URL, or `None` for in-memory and non-file URLs.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty() && path != ":memory:").then(|| Path::new(path))
}

/// Creates the `beans` table from the entity definition if it does not exist yet.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut bean_table = schema.create_table_from_entity(Bean);
    bean_table.if_not_exists();

    db.execute(builder.build(&bean_table)).await?;
    debug!("Ensured beans table exists");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::BeanModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        let beans: Vec<BeanModel> = Bean::find().limit(1).all(&db).await?;
        assert!(beans.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<BeanModel> = Bean::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path(DEFAULT_DATABASE_URL),
            Some(Path::new("data/all_the_beans.sqlite"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("sqlite://:memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/beans"), None);
    }
}
