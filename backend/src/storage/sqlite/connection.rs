use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:expenses.db";

/// SqliteConnection manages the pooled database handle and schema setup
#[derive(Clone)]
pub struct SqliteConnection {
    pool: Arc<SqlitePool>,
}

impl SqliteConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expense_items (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                expense_date TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expense_lists (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                title TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // position preserves membership insertion order
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expense_list_items (
                list_id TEXT NOT NULL,
                expense_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (list_id, expense_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_setup_creates_tables() {
        let connection = SqliteConnection::init_test()
            .await
            .expect("Failed to create test database");

        // Each table should be queryable right after setup
        for table in ["expense_items", "expense_lists", "expense_list_items"] {
            sqlx::query(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(connection.pool())
                .await
                .expect("table should exist");
        }
    }

    #[tokio::test]
    async fn test_setup_schema_is_idempotent() {
        let connection = SqliteConnection::init_test()
            .await
            .expect("Failed to create test database");

        SqliteConnection::setup_schema(connection.pool())
            .await
            .expect("re-running schema setup should succeed");
    }
}
