//! SQLite setup and connection management.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use crate::errors::StoreResult;
use crate::repository::{CacheRepository, ReviewRequestRepository, ReviewResultRepository};

/// Shared connection handle used by the repositories.
pub type DbConn = Arc<Mutex<Connection>>;

const SCHEMA_VERSION: i32 = 1;

/// Database wrapper that owns connection setup and schema initialization.
pub struct Database {
    conn: DbConn,
}

impl Database {
    /// Opens (or creates) the database at `path`, creating parent
    /// directories as needed.
    pub fn open_at(path: PathBuf) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "opening review store");
        let conn = Connection::open(&path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let existing: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if existing < SCHEMA_VERSION {
            Self::create_schema(&conn)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    fn create_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS review_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL,
                repo TEXT NOT NULL,
                pr_number INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                task_id TEXT,
                error_message TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(owner, repo, pr_number)
            );

            CREATE TABLE IF NOT EXISTS review_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                review_request_id INTEGER NOT NULL UNIQUE
                    REFERENCES review_requests(id) ON DELETE CASCADE,
                pr_details TEXT NOT NULL,
                overall_review TEXT NOT NULL,
                file_reviews TEXT NOT NULL,
                summary TEXT NOT NULL,
                quality_score INTEGER,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS repositories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                html_url TEXT NOT NULL,
                language TEXT,
                stargazers_count INTEGER NOT NULL DEFAULT 0,
                forks_count INTEGER NOT NULL DEFAULT 0,
                open_issues_count INTEGER NOT NULL DEFAULT 0,
                private INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(owner, name)
            );

            CREATE TABLE IF NOT EXISTS pull_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                repository_id INTEGER NOT NULL
                    REFERENCES repositories(id) ON DELETE CASCADE,
                number INTEGER NOT NULL,
                title TEXT NOT NULL,
                body TEXT,
                state TEXT NOT NULL,
                user_login TEXT NOT NULL,
                html_url TEXT NOT NULL,
                additions INTEGER,
                deletions INTEGER,
                changed_files INTEGER,
                draft INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(repository_id, number)
            );

            CREATE INDEX IF NOT EXISTS idx_review_requests_status
                ON review_requests(status);
            "#,
        )?;
        Ok(())
    }

    /// Clone of the shared connection handle.
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    pub fn review_requests(&self) -> ReviewRequestRepository {
        ReviewRequestRepository::new(self.connection())
    }

    pub fn review_results(&self) -> ReviewResultRepository {
        ReviewResultRepository::new(self.connection())
    }

    pub fn cache(&self) -> CacheRepository {
        CacheRepository::new(self.connection())
    }
}
