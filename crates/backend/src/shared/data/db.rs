use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Схема справочника локаций и записей, которые им ограничиваются
const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_location",
        r#"
        CREATE TABLE IF NOT EXISTS a001_location (
            id TEXT PRIMARY KEY NOT NULL,
            tier TEXT NOT NULL,
            name TEXT NOT NULL,
            parent_id TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "a001_location_parent_idx",
        "CREATE INDEX IF NOT EXISTS idx_a001_location_parent ON a001_location (tier, parent_id);",
    ),
    (
        "a002_supplier",
        r#"
        CREATE TABLE IF NOT EXISTS a002_supplier (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL,
            supplier_type TEXT NOT NULL,
            product TEXT NOT NULL,
            category TEXT NOT NULL,
            brand TEXT,
            state_id TEXT NOT NULL,
            cluster_id TEXT,
            district_id TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT
        );
        "#,
    ),
    (
        "a003_project",
        r#"
        CREATE TABLE IF NOT EXISTS a003_project (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            customer TEXT NOT NULL,
            capacity_kw REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL,
            state_id TEXT NOT NULL,
            cluster_id TEXT NOT NULL,
            district_id TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT
        );
        "#,
    ),
];

fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = sqlite_url(db_file)?;
    tracing::info!("Connecting to {}", db_url);
    let conn = Database::connect(&db_url).await?;

    for (name, sql) in SCHEMA {
        tracing::debug!("Ensuring schema object {}", name);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection already initialized"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_for_absolute_path() {
        let url = sqlite_url(Path::new("/var/lib/solar/app.db")).unwrap();
        assert_eq!(url, "sqlite:///var/lib/solar/app.db?mode=rwc");
    }
}
