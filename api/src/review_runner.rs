//! Drives the review state machine around the pipeline.
//!
//! One request row per `(owner, repo, pr_number)` is the unit of mutual
//! exclusion: a run starts only after the row is claimed via the
//! conditional `processing` transition, so concurrent triggers for the
//! same pull request cannot start two pipelines.

use std::sync::Arc;

use pr_reviewer::{
    Completion, PromptCatalog, ReviewError, ReviewLimits, ReviewOutcome, SourceControl,
    run_review,
};
use review_store::{
    Database, NewReviewResult, PullRequestUpsert, RepositoryUpsert, ReviewRequest, ReviewStatus,
    StoreError, StoredReviewResult,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};

/// What a trigger call resolved to.
pub enum TriggerOutcome {
    /// Identity already reviewed; stored result returned without a re-run.
    AlreadyCompleted {
        request: ReviewRequest,
        result: StoredReviewResult,
    },
    /// A run is in flight for this identity; no second run started.
    AlreadyProcessing { request: ReviewRequest },
    /// Run spawned in the background.
    Accepted {
        request: ReviewRequest,
        task_id: String,
    },
    /// Run executed inline to completion.
    Completed {
        request: ReviewRequest,
        result: StoredReviewResult,
    },
}

/// Resolves a trigger for one pull request identity.
pub async fn trigger_review(
    state: AppState,
    owner: String,
    repo: String,
    pr_number: u64,
    async_review: bool,
    force: bool,
) -> AppResult<TriggerOutcome> {
    let requests = state.db.review_requests();
    let request = requests.get_or_create(&owner, &repo, pr_number)?;

    if request.status == ReviewStatus::Completed && !force {
        // A completed row without its result row cannot normally happen;
        // if the result is gone, fall through and re-run.
        if let Some(result) = state.db.review_results().find_by_request(request.id)? {
            info!(id = request.id, "review already completed, returning stored result");
            return Ok(TriggerOutcome::AlreadyCompleted { request, result });
        }
    }

    let task_id = Uuid::new_v4().to_string();
    if !requests.try_mark_processing(request.id, Some(&task_id))? {
        info!(id = request.id, "review already in flight, not starting a second run");
        return Ok(TriggerOutcome::AlreadyProcessing { request });
    }

    let request = requests
        .find(request.id)?
        .ok_or_else(|| AppError::NotFound(format!("review request {} not found", request.id)))?;

    if async_review {
        let run_state = state.clone();
        let (run_owner, run_repo) = (owner.clone(), repo.clone());
        let id = request.id;
        tokio::spawn(async move {
            // Failures are recorded on the request row; nothing to return.
            let _ = execute_run(run_state, id, &run_owner, &run_repo, pr_number).await;
        });
        return Ok(TriggerOutcome::Accepted { request, task_id });
    }

    execute_run(state.clone(), request.id, &owner, &repo, pr_number).await?;

    let requests = state.db.review_requests();
    let request = requests
        .find(request.id)?
        .ok_or_else(|| AppError::NotFound(format!("review request {} not found", request.id)))?;
    let result = state
        .db
        .review_results()
        .find_by_request(request.id)?
        .ok_or_else(|| {
            AppError::Pipeline(ReviewError::Internal(
                "completed review has no stored result".into(),
            ))
        })?;
    Ok(TriggerOutcome::Completed { request, result })
}

/// Runs the pipeline for a claimed request and records the terminal state.
async fn execute_run(
    state: AppState,
    request_id: i64,
    owner: &str,
    repo: &str,
    pr_number: u64,
) -> AppResult<()> {
    run_and_record(
        &state.db,
        &state.github,
        state.completion.clone(),
        state.catalog.clone(),
        state.limits,
        request_id,
        owner,
        repo,
        pr_number,
    )
    .await
}

/// Pipeline execution plus terminal-state bookkeeping, generic over the
/// collaborators so the failure path stays testable without the network.
#[allow(clippy::too_many_arguments)]
async fn run_and_record<S, C>(
    db: &Database,
    source: &S,
    completion: Arc<C>,
    catalog: Arc<PromptCatalog>,
    limits: ReviewLimits,
    request_id: i64,
    owner: &str,
    repo: &str,
    pr_number: u64,
) -> AppResult<()>
where
    S: SourceControl,
    C: Completion,
{
    info!(request_id, "starting review run for {owner}/{repo}#{pr_number}");

    match run_review(source, completion, catalog, limits, owner, repo, pr_number).await {
        Ok(outcome) => {
            refresh_cache(db, owner, repo, &outcome);

            let payload = NewReviewResult {
                pr_details: serde_json::to_value(&outcome.pr_details).map_err(StoreError::from)?,
                overall_review: outcome.overall_review,
                file_reviews: serde_json::to_value(&outcome.file_reviews)
                    .map_err(StoreError::from)?,
                summary: outcome.summary,
                quality_score: outcome.quality_score,
            };
            db.review_requests().complete(request_id, &payload)?;
            info!(request_id, "review run completed");
            Ok(())
        }
        Err(e) => {
            error!(request_id, "review run failed: {e}");
            db.review_requests()
                .mark_failed(request_id, &format!("PR analysis failed: {e}"))?;
            Err(e.into())
        }
    }
}

/// Best-effort cache refresh; the remote stays authoritative and a cache
/// write failure never fails the run.
fn refresh_cache(db: &Database, owner: &str, repo: &str, outcome: &ReviewOutcome) {
    let cache = db.cache();

    let repo_id = match cache.find_repository(owner, repo) {
        Ok(Some(cached)) => Ok(cached.id),
        Ok(None) => cache.upsert_repository(&RepositoryUpsert {
            owner: owner.to_string(),
            name: repo.to_string(),
            description: None,
            html_url: format!("https://github.com/{owner}/{repo}"),
            language: None,
            stargazers_count: 0,
            forks_count: 0,
            open_issues_count: 0,
            private: false,
        }),
        Err(e) => Err(e),
    };

    let repo_id = match repo_id {
        Ok(id) => id,
        Err(e) => {
            warn!("repository cache refresh failed: {e}");
            return;
        }
    };

    let pr = &outcome.pr_details;
    let upsert = PullRequestUpsert {
        repository_id: repo_id,
        number: pr.number,
        title: pr.title.clone(),
        body: pr.body.clone(),
        state: pr.state.clone(),
        user_login: pr.user.login.clone(),
        html_url: pr.html_url.clone(),
        additions: pr.additions,
        deletions: pr.deletions,
        changed_files: pr.changed_files,
        draft: pr.draft,
    };
    if let Err(e) = cache.upsert_pull_request(&upsert) {
        warn!("pull request cache refresh failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use github_client::{
        GitHubApiError, GitHubClient, GitHubClientConfig, GitHubClientError, GitHubResult,
        PrDetails, PrFile,
    };
    use llm_service::{CompletionError, CompletionService, LlmModelConfig};
    use serde_json::json;

    use super::*;

    /// State wired to an in-memory store; collaborators are constructed but
    /// never reach the network in these tests.
    fn state() -> AppState {
        let github = GitHubClient::new(GitHubClientConfig {
            token: "test-token".into(),
            ..Default::default()
        })
        .unwrap();
        let completion = CompletionService::new(LlmModelConfig {
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(1),
        })
        .unwrap();

        AppState {
            db: Arc::new(Database::open_in_memory().unwrap()),
            github,
            completion: Arc::new(completion),
            catalog: Arc::new(PromptCatalog::builtin()),
            limits: ReviewLimits::default(),
        }
    }

    fn completed_payload() -> NewReviewResult {
        NewReviewResult {
            pr_details: json!({"number": 7, "title": "Add widget"}),
            overall_review: "fine".into(),
            file_reviews: json!([]),
            summary: "ok".into(),
            quality_score: None,
        }
    }

    #[tokio::test]
    async fn completed_identity_returns_stored_result_without_rerun() {
        let state = state();
        let requests = state.db.review_requests();
        let req = requests.get_or_create("acme", "widgets", 7).unwrap();
        requests.complete(req.id, &completed_payload()).unwrap();

        let outcome = trigger_review(state, "acme".into(), "widgets".into(), 7, false, false)
            .await
            .unwrap();

        match outcome {
            TriggerOutcome::AlreadyCompleted { request, result } => {
                assert_eq!(request.id, req.id);
                assert_eq!(result.summary, "ok");
            }
            _ => panic!("expected AlreadyCompleted"),
        }
    }

    /// Fails every fetch, as an unreachable or misconfigured remote would.
    struct FailingSource;

    impl SourceControl for FailingSource {
        async fn pr_details(&self, _: &str, _: &str, _: u64) -> GitHubResult<PrDetails> {
            Err(GitHubClientError::Api(GitHubApiError::NotFound))
        }

        async fn pr_diff(&self, _: &str, _: &str, _: u64) -> GitHubResult<String> {
            Err(GitHubClientError::Api(GitHubApiError::NotFound))
        }

        async fn pr_files(&self, _: &str, _: &str, _: u64) -> GitHubResult<Vec<PrFile>> {
            Err(GitHubClientError::Api(GitHubApiError::NotFound))
        }
    }

    /// Never reached when the fetch stage fails first.
    struct UnusedCompletion;

    impl Completion for UnusedCompletion {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            Err(CompletionError::EmptyChoices)
        }
    }

    #[tokio::test]
    async fn fetch_failure_marks_request_failed_with_no_result() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let requests = db.review_requests();
        let req = requests.get_or_create("acme", "widgets", 7).unwrap();
        assert!(requests.try_mark_processing(req.id, Some("task-1")).unwrap());

        let err = run_and_record(
            &db,
            &FailingSource,
            Arc::new(UnusedCompletion),
            Arc::new(PromptCatalog::builtin()),
            ReviewLimits::default(),
            req.id,
            "acme",
            "widgets",
            7,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Pipeline(_)));

        let req = requests.find(req.id).unwrap().unwrap();
        assert_eq!(req.status, ReviewStatus::Failed);
        assert!(
            req.error_message
                .as_deref()
                .unwrap()
                .starts_with("PR analysis failed")
        );
        assert!(db.review_results().find_by_request(req.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn in_flight_identity_is_not_run_twice() {
        let state = state();
        let requests = state.db.review_requests();
        let req = requests.get_or_create("acme", "widgets", 7).unwrap();
        assert!(requests.try_mark_processing(req.id, Some("task-1")).unwrap());

        let outcome = trigger_review(state, "acme".into(), "widgets".into(), 7, true, false)
            .await
            .unwrap();

        match outcome {
            TriggerOutcome::AlreadyProcessing { request } => {
                assert_eq!(request.id, req.id);
                assert_eq!(request.status, ReviewStatus::Processing);
                assert_eq!(request.task_id.as_deref(), Some("task-1"));
            }
            _ => panic!("expected AlreadyProcessing"),
        }
    }
}
