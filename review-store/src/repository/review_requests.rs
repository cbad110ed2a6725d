//! Review request rows and their state machine.
//!
//! Transitions: `pending → processing → {completed, failed}`, with `failed`
//! re-runnable. The row is the unit of mutual exclusion: moving into
//! `processing` is a conditional update, so two concurrent triggers for the
//! same identity cannot both start a run.

use std::str::FromStr;

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

use crate::database::DbConn;
use crate::errors::{StoreError, StoreResult};
use crate::models::{NewReviewResult, ReviewRequest, ReviewStatus};

const COLUMNS: &str =
    "id, owner, repo, pr_number, status, task_id, error_message, created_at, updated_at";

pub struct ReviewRequestRepository {
    conn: DbConn,
}

impl ReviewRequestRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Finds or creates the request row for an identity tuple.
    ///
    /// Idempotent: repeated calls for the same `(owner, repo, pr_number)`
    /// return the same row.
    pub fn get_or_create(&self, owner: &str, repo: &str, pr_number: u64) -> StoreResult<ReviewRequest> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        conn.execute(
            "INSERT INTO review_requests (owner, repo, pr_number, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, 'pending', ?4, ?4)
             ON CONFLICT(owner, repo, pr_number) DO NOTHING",
            params![owner, repo, pr_number as i64, now],
        )?;

        let request = conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM review_requests
                 WHERE owner = ?1 AND repo = ?2 AND pr_number = ?3"
            ),
            params![owner, repo, pr_number as i64],
            row_to_request,
        )?;
        Ok(request)
    }

    pub fn find(&self, id: i64) -> StoreResult<Option<ReviewRequest>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM review_requests WHERE id = ?1"),
                [id],
                row_to_request,
            )
            .optional()?;
        Ok(row)
    }

    /// Claims the row for a run.
    ///
    /// Returns `false` when the row is already `processing` (another run is
    /// in flight) or does not exist; the caller must not start a pipeline in
    /// that case.
    pub fn try_mark_processing(&self, id: i64, task_id: Option<&str>) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let affected = conn.execute(
            "UPDATE review_requests
             SET status = 'processing', task_id = ?2, error_message = NULL, updated_at = ?3
             WHERE id = ?1 AND status != 'processing'",
            params![id, task_id, Utc::now()],
        )?;
        debug!(id, claimed = affected == 1, "mark_processing");
        Ok(affected == 1)
    }

    /// Transitions to `completed` and upserts the single result row, in one
    /// transaction. No partial state is ever visible.
    pub fn complete(&self, id: i64, result: &NewReviewResult) -> StoreResult<()> {
        let pr_details = serde_json::to_string(&result.pr_details)?;
        let file_reviews = serde_json::to_string(&result.file_reviews)?;

        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let tx = conn.transaction()?;
        let now = Utc::now();

        let updated = tx.execute(
            "UPDATE review_requests
             SET status = 'completed', error_message = NULL, updated_at = ?2
             WHERE id = ?1",
            params![id, now],
        )?;
        if updated == 0 {
            return Err(StoreError::RequestNotFound(id));
        }

        tx.execute(
            "INSERT INTO review_results
                 (review_request_id, pr_details, overall_review, file_reviews,
                  summary, quality_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(review_request_id) DO UPDATE SET
                 pr_details = excluded.pr_details,
                 overall_review = excluded.overall_review,
                 file_reviews = excluded.file_reviews,
                 summary = excluded.summary,
                 quality_score = excluded.quality_score,
                 created_at = excluded.created_at",
            params![
                id,
                pr_details,
                result.overall_review,
                file_reviews,
                result.summary,
                result.quality_score,
                now,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Transitions to `failed`, recording the error message.
    pub fn mark_failed(&self, id: i64, error: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let affected = conn.execute(
            "UPDATE review_requests
             SET status = 'failed', error_message = ?2, updated_at = ?3
             WHERE id = ?1",
            params![id, error, Utc::now()],
        )?;
        if affected == 0 {
            return Err(StoreError::RequestNotFound(id));
        }
        Ok(())
    }

    /// Pages through request rows, newest first, optionally filtered by
    /// status. Returns the page and the total matching count.
    pub fn list(
        &self,
        page: u32,
        per_page: u32,
        status: Option<ReviewStatus>,
    ) -> StoreResult<(Vec<ReviewRequest>, u64)> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let offset = (page.max(1) - 1) as i64 * per_page as i64;

        let (rows, total) = match status {
            Some(status) => {
                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM review_requests WHERE status = ?1",
                    [status.as_str()],
                    |row| row.get(0),
                )?;
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM review_requests
                     WHERE status = ?1
                     ORDER BY updated_at DESC, id DESC
                     LIMIT ?2 OFFSET ?3"
                ))?;
                let rows = stmt
                    .query_map(params![status.as_str(), per_page as i64, offset], row_to_request)?
                    .collect::<Result<Vec<_>, _>>()?;
                (rows, total)
            }
            None => {
                let total: i64 =
                    conn.query_row("SELECT COUNT(*) FROM review_requests", [], |row| row.get(0))?;
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM review_requests
                     ORDER BY updated_at DESC, id DESC
                     LIMIT ?1 OFFSET ?2"
                ))?;
                let rows = stmt
                    .query_map(params![per_page as i64, offset], row_to_request)?
                    .collect::<Result<Vec<_>, _>>()?;
                (rows, total)
            }
        };

        Ok((rows, total as u64))
    }

    /// Deletes a request row; the result row goes with it via cascade.
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let affected = conn.execute("DELETE FROM review_requests WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }
}

fn row_to_request(row: &Row<'_>) -> rusqlite::Result<ReviewRequest> {
    let status_raw: String = row.get(4)?;
    let status = ReviewStatus::from_str(&status_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ReviewRequest {
        id: row.get(0)?,
        owner: row.get(1)?,
        repo: row.get(2)?,
        pr_number: row.get::<_, i64>(3)? as u64,
        status,
        task_id: row.get(5)?,
        error_message: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
