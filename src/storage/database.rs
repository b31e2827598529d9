use sqlx::{migrate::MigrateDatabase, SqlitePool};
use std::path::Path;
use tracing::{error, info};

use crate::error::Result;

/// Schema applied on every open. CREATE IF NOT EXISTS keeps the call
/// idempotent and safe against concurrent schema initialization; existing
/// rows are never touched. AUTOINCREMENT pins ids to a strictly increasing,
/// never-reused sequence.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount REAL NOT NULL,
        category TEXT NOT NULL,
        subcategory TEXT NOT NULL DEFAULT '',
        note TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
];

/// Database connection manager owning the pool and the expense schema
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if necessary) the database at the given path and
    /// ensure the expense schema exists before any operation runs.
    pub async fn open(db_path: &Path) -> Result<Self> {
        info!("Initializing database at: {:?}", db_path);

        if !db_path.exists() {
            info!("Database doesn't exist, creating new database");
            sqlx::Sqlite::create_database(&format!("sqlite:{}", db_path.display())).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&database_url).await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        info!("Database initialized successfully");
        Ok(db)
    }

    /// Create the expense table and indexes if absent. Safe to call
    /// multiple times; never drops or alters existing data.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection
    pub async fn close(self) {
        self.pool.close().await;
        info!("Database connection closed");
    }

    /// Verify database integrity
    pub async fn verify_integrity(&self) -> Result<bool> {
        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&self.pool)
            .await?;

        let is_ok = integrity_result == "ok";

        if is_ok {
            info!("Database integrity check passed");
        } else {
            error!("Database integrity check failed: {}", integrity_result);
        }

        Ok(is_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_database() -> (Database, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("expenses.db");
        let db = Database::open(&db_path).await.unwrap();
        (db, temp_dir)
    }

    #[tokio::test]
    async fn test_database_creation() {
        let (db, _temp_dir) = create_test_database().await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let (db, _temp_dir) = create_test_database().await;

        sqlx::query("INSERT INTO expenses (date, amount, category) VALUES (?, ?, ?)")
            .bind("2024-01-01")
            .bind(12.5_f64)
            .bind("food")
            .execute(db.pool())
            .await
            .unwrap();

        // A second initialization must leave the table and its rows intact.
        db.ensure_schema().await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'expenses'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(tables, 1);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_reopen_preserves_rows() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("expenses.db");

        let db = Database::open(&db_path).await.unwrap();
        sqlx::query("INSERT INTO expenses (date, amount, category) VALUES (?, ?, ?)")
            .bind("2024-01-01")
            .bind(3.0_f64)
            .bind("transport")
            .execute(db.pool())
            .await
            .unwrap();
        db.close().await;

        let db = Database::open(&db_path).await.unwrap();
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_database_integrity() {
        let (db, _temp_dir) = create_test_database().await;

        let is_ok = db.verify_integrity().await.unwrap();
        assert!(is_ok);
    }
}
