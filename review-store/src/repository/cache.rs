//! Cache mirrors of remote repositories and pull requests.
//!
//! Upserted opportunistically whenever fresh data is fetched; the remote
//! stays authoritative and nothing in the pipeline reads these back on the
//! hot path.

use rusqlite::{OptionalExtension, Row, params};

use crate::database::DbConn;
use crate::errors::StoreResult;
use crate::models::{CachedPullRequest, CachedRepository, PullRequestUpsert, RepositoryUpsert};

pub struct CacheRepository {
    conn: DbConn,
}

impl CacheRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Inserts or refreshes a repository mirror, returning its row id.
    pub fn upsert_repository(&self, repo: &RepositoryUpsert) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let now = chrono::Utc::now();
        let id = conn.query_row(
            "INSERT INTO repositories
                 (owner, name, description, html_url, language, stargazers_count,
                  forks_count, open_issues_count, private, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             ON CONFLICT(owner, name) DO UPDATE SET
                 description = excluded.description,
                 html_url = excluded.html_url,
                 language = excluded.language,
                 stargazers_count = excluded.stargazers_count,
                 forks_count = excluded.forks_count,
                 open_issues_count = excluded.open_issues_count,
                 private = excluded.private,
                 updated_at = excluded.updated_at
             RETURNING id",
            params![
                repo.owner,
                repo.name,
                repo.description,
                repo.html_url,
                repo.language,
                repo.stargazers_count,
                repo.forks_count,
                repo.open_issues_count,
                repo.private,
                now,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Inserts or refreshes a pull request mirror, returning its row id.
    pub fn upsert_pull_request(&self, pr: &PullRequestUpsert) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let now = chrono::Utc::now();
        let id = conn.query_row(
            "INSERT INTO pull_requests
                 (repository_id, number, title, body, state, user_login, html_url,
                  additions, deletions, changed_files, draft, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
             ON CONFLICT(repository_id, number) DO UPDATE SET
                 title = excluded.title,
                 body = excluded.body,
                 state = excluded.state,
                 user_login = excluded.user_login,
                 html_url = excluded.html_url,
                 additions = excluded.additions,
                 deletions = excluded.deletions,
                 changed_files = excluded.changed_files,
                 draft = excluded.draft,
                 updated_at = excluded.updated_at
             RETURNING id",
            params![
                pr.repository_id,
                pr.number as i64,
                pr.title,
                pr.body,
                pr.state,
                pr.user_login,
                pr.html_url,
                pr.additions,
                pr.deletions,
                pr.changed_files,
                pr.draft,
                now,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn find_repository(&self, owner: &str, name: &str) -> StoreResult<Option<CachedRepository>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let row = conn
            .query_row(
                "SELECT id, owner, name, description, html_url, language,
                        stargazers_count, forks_count, open_issues_count, private,
                        created_at, updated_at
                 FROM repositories WHERE owner = ?1 AND name = ?2",
                params![owner, name],
                row_to_repository,
            )
            .optional()?;
        Ok(row)
    }

    pub fn find_pull_request(
        &self,
        repository_id: i64,
        number: u64,
    ) -> StoreResult<Option<CachedPullRequest>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let row = conn
            .query_row(
                "SELECT id, repository_id, number, title, body, state, user_login,
                        html_url, additions, deletions, changed_files, draft,
                        created_at, updated_at
                 FROM pull_requests WHERE repository_id = ?1 AND number = ?2",
                params![repository_id, number as i64],
                row_to_pull_request,
            )
            .optional()?;
        Ok(row)
    }
}

fn row_to_repository(row: &Row<'_>) -> rusqlite::Result<CachedRepository> {
    Ok(CachedRepository {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        html_url: row.get(4)?,
        language: row.get(5)?,
        stargazers_count: row.get(6)?,
        forks_count: row.get(7)?,
        open_issues_count: row.get(8)?,
        private: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn row_to_pull_request(row: &Row<'_>) -> rusqlite::Result<CachedPullRequest> {
    Ok(CachedPullRequest {
        id: row.get(0)?,
        repository_id: row.get(1)?,
        number: row.get::<_, i64>(2)? as u64,
        title: row.get(3)?,
        body: row.get(4)?,
        state: row.get(5)?,
        user_login: row.get(6)?,
        html_url: row.get(7)?,
        additions: row.get(8)?,
        deletions: row.get(9)?,
        changed_files: row.get(10)?,
        draft: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}
