use std::str::FromStr;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{query_scalar, Sqlite, SqlitePool};
use tracing::{debug, info};

/// Helper function to extract the database path from a SQLite URL
pub fn extract_db_path_from_url(url: &str) -> Option<String> {
    let path_part = url.strip_prefix("sqlite://")?;

    if cfg!(windows) {
        // Windows: sqlite:///C:/path or sqlite://C:/path
        if path_part.find(':').is_some_and(|drive_idx| drive_idx > 0) {
            return Some(
                path_part
                    .strip_prefix('/')
                    .unwrap_or(path_part)
                    .to_string(),
            );
        }
    }

    // Unix-like absolute path: sqlite:///path
    if path_part.starts_with('/') {
        return Some(format!("/{}", path_part.trim_start_matches('/')));
    }

    Some(path_part.to_string())
}

/// Opens an existing insights database read-only. The schema belongs to the
/// extraction pipeline, so a missing file is an error rather than created.
pub async fn connect_existing(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let db_path = extract_db_path_from_url(database_url).ok_or_else(|| {
        sqlx::Error::Configuration(format!("not a valid SQLite URL: {database_url}").into())
    })?;
    debug!(%db_path, "checking insights database");

    if !Sqlite::database_exists(database_url).await? {
        return Err(sqlx::Error::Configuration(
            format!("database not found at {db_path}").into(),
        ));
    }

    let options = SqliteConnectOptions::from_str(database_url)?.read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA query_only = ON;").await?;
                Ok(())
            })
        })
        .connect_with(options)
        .await?;

    info!(%db_path, "connected to insights database");
    Ok(pool)
}

/// Whether `table` exists. Table names come from [`crate::DataKind`] and
/// fixed source tables, never from user input.
pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, sqlx::Error> {
    let count: i64 =
        query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}
