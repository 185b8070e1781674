use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use tokio::fs;

pub type OrmConn = DatabaseConnection;
pub type DbPool = sqlx::PgPool;

const MIGRATIONS_DIR: &str = "migrations";

/// Create a SeaORM connection over a sqlx Postgres pool.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(20)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Split a migration file into single statements. Chunks holding only
/// comments are dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| {
            stmt.lines()
                .any(|l| !l.trim().is_empty() && !l.trim().starts_with("--"))
        })
        .map(|stmt| format!("{stmt};"))
        .collect()
}

/// Apply every `migrations/*.sql` file not yet recorded in `schema_migrations`,
/// in filename order. Each file runs in its own transaction.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(
        backend,
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ))
    .await?;

    let mut entries = fs::read_dir(MIGRATIONS_DIR)
        .await
        .with_context(|| format!("reading {MIGRATIONS_DIR}/"))?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();

    for file in files {
        let Some(version) = file.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            continue;
        };

        let applied = conn
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT 1 FROM schema_migrations WHERE version = $1",
                [version.clone().into()],
            ))
            .await?;
        if applied.is_some() {
            continue;
        }

        let sql = fs::read_to_string(&file).await?;
        // Postgres prepared statements cannot contain multiple commands.
        let txn = conn.begin().await?;
        for stmt in split_statements(&sql) {
            txn.execute(Statement::from_string(backend, stmt))
                .await
                .with_context(|| format!("migration {version} failed"))?;
        }
        txn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO schema_migrations (version) VALUES ($1)",
            [version.clone().into()],
        ))
        .await?;
        txn.commit().await?;

        tracing::info!(version = %version, "migration applied");
    }

    Ok(())
}
