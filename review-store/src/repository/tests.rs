use serde_json::json;

use crate::database::Database;
use crate::errors::StoreError;
use crate::models::{
    NewReviewResult, PullRequestUpsert, RepositoryUpsert, ReviewStatus,
};

fn db() -> Database {
    Database::open_in_memory().unwrap()
}

fn result_payload(summary: &str) -> NewReviewResult {
    NewReviewResult {
        pr_details: json!({"number": 7, "title": "Add widget"}),
        overall_review: "Overall Quality Score: 8/10".into(),
        file_reviews: json!([{"file": "a.py", "language": "Python"}]),
        summary: summary.into(),
        quality_score: Some(8),
    }
}

#[test]
fn get_or_create_is_idempotent_on_identity() {
    let db = db();
    let requests = db.review_requests();

    let first = requests.get_or_create("acme", "widgets", 7).unwrap();
    let second = requests.get_or_create("acme", "widgets", 7).unwrap();
    let other = requests.get_or_create("acme", "widgets", 8).unwrap();

    assert_eq!(first.id, second.id);
    assert_ne!(first.id, other.id);
    assert_eq!(first.status, ReviewStatus::Pending);
}

#[test]
fn processing_claim_is_exclusive() {
    let db = db();
    let requests = db.review_requests();
    let req = requests.get_or_create("acme", "widgets", 7).unwrap();

    assert!(requests.try_mark_processing(req.id, Some("task-1")).unwrap());
    // Second trigger while in flight must not claim the row.
    assert!(!requests.try_mark_processing(req.id, Some("task-2")).unwrap());

    let row = requests.find(req.id).unwrap().unwrap();
    assert_eq!(row.status, ReviewStatus::Processing);
    assert_eq!(row.task_id.as_deref(), Some("task-1"));
}

#[test]
fn complete_transitions_and_stores_exactly_one_result() {
    let db = db();
    let requests = db.review_requests();
    let results = db.review_results();
    let req = requests.get_or_create("acme", "widgets", 7).unwrap();

    requests.try_mark_processing(req.id, None).unwrap();
    requests.complete(req.id, &result_payload("first")).unwrap();

    let row = requests.find(req.id).unwrap().unwrap();
    assert_eq!(row.status, ReviewStatus::Completed);
    assert!(row.error_message.is_none());

    let stored = results.find_by_request(req.id).unwrap().unwrap();
    assert_eq!(stored.summary, "first");
    assert_eq!(stored.quality_score, Some(8));
    assert_eq!(stored.pr_details["title"], "Add widget");

    // Re-running (force) replaces the single result row in place.
    requests.try_mark_processing(req.id, None).unwrap();
    requests.complete(req.id, &result_payload("second")).unwrap();
    let stored = results.find_by_request(req.id).unwrap().unwrap();
    assert_eq!(stored.summary, "second");

    let conn = db.connection();
    let conn = conn.lock().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM review_results WHERE review_request_id = ?1",
            [req.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn failed_request_is_rerunnable() {
    let db = db();
    let requests = db.review_requests();
    let req = requests.get_or_create("acme", "widgets", 7).unwrap();

    requests.try_mark_processing(req.id, None).unwrap();
    requests.mark_failed(req.id, "PR analysis failed").unwrap();

    let row = requests.find(req.id).unwrap().unwrap();
    assert_eq!(row.status, ReviewStatus::Failed);
    assert_eq!(row.error_message.as_deref(), Some("PR analysis failed"));
    // No partial result was persisted.
    assert!(db.review_results().find_by_request(req.id).unwrap().is_none());

    // A failed row can be claimed again; claiming clears the error.
    assert!(requests.try_mark_processing(req.id, None).unwrap());
    let row = requests.find(req.id).unwrap().unwrap();
    assert_eq!(row.status, ReviewStatus::Processing);
    assert!(row.error_message.is_none());
}

#[test]
fn complete_on_unknown_id_is_an_error() {
    let db = db();
    let err = db
        .review_requests()
        .complete(999, &result_payload("x"))
        .unwrap_err();
    assert!(matches!(err, StoreError::RequestNotFound(999)));
}

#[test]
fn delete_cascades_to_result() {
    let db = db();
    let requests = db.review_requests();
    let req = requests.get_or_create("acme", "widgets", 7).unwrap();
    requests.complete(req.id, &result_payload("x")).unwrap();

    assert!(requests.delete(req.id).unwrap());
    assert!(requests.find(req.id).unwrap().is_none());
    assert!(db.review_results().find_by_request(req.id).unwrap().is_none());
    // Deleting again reports nothing removed.
    assert!(!requests.delete(req.id).unwrap());
}

#[test]
fn list_pages_and_filters_by_status() {
    let db = db();
    let requests = db.review_requests();
    for n in 1..=5 {
        requests.get_or_create("acme", "widgets", n).unwrap();
    }
    let failed = requests.get_or_create("acme", "widgets", 6).unwrap();
    requests.try_mark_processing(failed.id, None).unwrap();
    requests.mark_failed(failed.id, "boom").unwrap();

    let (page, total) = requests.list(1, 4, None).unwrap();
    assert_eq!(total, 6);
    assert_eq!(page.len(), 4);
    let (page2, _) = requests.list(2, 4, None).unwrap();
    assert_eq!(page2.len(), 2);

    let (only_failed, total) = requests.list(1, 10, Some(ReviewStatus::Failed)).unwrap();
    assert_eq!(total, 1);
    assert_eq!(only_failed[0].pr_number, 6);

    let (pending, total) = requests.list(1, 10, Some(ReviewStatus::Pending)).unwrap();
    assert_eq!(total, 5);
    assert_eq!(pending.len(), 5);
}

#[test]
fn repository_and_pull_request_upserts_refresh_in_place() {
    let db = db();
    let cache = db.cache();

    let mut repo = RepositoryUpsert {
        owner: "acme".into(),
        name: "widgets".into(),
        description: None,
        html_url: "https://github.com/acme/widgets".into(),
        language: Some("Rust".into()),
        stargazers_count: 1,
        forks_count: 0,
        open_issues_count: 2,
        private: false,
    };
    let repo_id = cache.upsert_repository(&repo).unwrap();

    repo.stargazers_count = 5;
    repo.description = Some("widget factory".into());
    assert_eq!(cache.upsert_repository(&repo).unwrap(), repo_id);

    let cached = cache.find_repository("acme", "widgets").unwrap().unwrap();
    assert_eq!(cached.stargazers_count, 5);
    assert_eq!(cached.description.as_deref(), Some("widget factory"));

    let mut pr = PullRequestUpsert {
        repository_id: repo_id,
        number: 7,
        title: "Add widget".into(),
        body: None,
        state: "open".into(),
        user_login: "octocat".into(),
        html_url: "https://github.com/acme/widgets/pull/7".into(),
        additions: Some(12),
        deletions: Some(3),
        changed_files: Some(2),
        draft: false,
    };
    let pr_id = cache.upsert_pull_request(&pr).unwrap();

    pr.state = "closed".into();
    assert_eq!(cache.upsert_pull_request(&pr).unwrap(), pr_id);
    let cached = cache.find_pull_request(repo_id, 7).unwrap().unwrap();
    assert_eq!(cached.state, "closed");
}
