//! Stored review results (one per completed request).
//!
//! Writes happen inside the request repository's `complete` transaction;
//! this repository only reads.

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use crate::database::DbConn;
use crate::errors::StoreResult;
use crate::models::StoredReviewResult;

pub struct ReviewResultRepository {
    conn: DbConn,
}

struct RawResult {
    id: i64,
    review_request_id: i64,
    pr_details: String,
    overall_review: String,
    file_reviews: String,
    summary: String,
    quality_score: Option<i32>,
    created_at: DateTime<Utc>,
}

impl ReviewResultRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn find_by_request(&self, request_id: i64) -> StoreResult<Option<StoredReviewResult>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let raw = conn
            .query_row(
                "SELECT id, review_request_id, pr_details, overall_review,
                        file_reviews, summary, quality_score, created_at
                 FROM review_results WHERE review_request_id = ?1",
                [request_id],
                |row| {
                    Ok(RawResult {
                        id: row.get(0)?,
                        review_request_id: row.get(1)?,
                        pr_details: row.get(2)?,
                        overall_review: row.get(3)?,
                        file_reviews: row.get(4)?,
                        summary: row.get(5)?,
                        quality_score: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                },
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        Ok(Some(StoredReviewResult {
            id: raw.id,
            review_request_id: raw.review_request_id,
            pr_details: serde_json::from_str(&raw.pr_details)?,
            overall_review: raw.overall_review,
            file_reviews: serde_json::from_str(&raw.file_reviews)?,
            summary: raw.summary,
            quality_score: raw.quality_score,
            created_at: raw.created_at,
        }))
    }
}
