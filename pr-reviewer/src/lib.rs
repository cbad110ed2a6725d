//! PR review pipeline: fetch, per-file analysis, aggregation.
//!
//! `run_review` drives one complete review of a pull request:
//!   step1: fetch PR metadata, unified diff, and changed-file list
//!   step2: review each eligible file (sequential, capped)
//!   step3: aggregate into an overall review, summary, and quality score
//!
//! Source-control failures abort the run. Completion failures never do:
//! they degrade to deterministic fallback content so a run that could fetch
//! its inputs always produces a complete [`ReviewOutcome`].

pub mod collaborators;
pub mod errors;
pub mod file_review;
pub mod lang;
pub mod limits;
pub mod parser;
pub mod prompts;
pub mod score;
pub mod types;

use std::sync::Arc;

use tracing::{info, warn};

pub use collaborators::{Completion, SourceControl};
pub use errors::{PipelineResult, ReviewError};
pub use file_review::FileReviewer;
pub use limits::ReviewLimits;
pub use prompts::PromptCatalog;
pub use types::{ChangeCounts, FileReviewRecord, ReviewOutcome};

use github_client::{PrDetails, PrFile};
use lang::detect_language;
use limits::truncate_chars;
use prompts::{OVERALL_REVIEW, SUMMARY_GENERATION, render};

/// Runs one full review of `owner/repo#pr_number`.
///
/// Files with status `removed` are skipped; at most `limits.max_files`
/// files are reviewed, in API order. Each file runs in its own task so a
/// panic degrades to an explicit error record instead of poisoning the run;
/// tasks are awaited sequentially to keep provider rate usage predictable
/// and output order equal to input order.
pub async fn run_review<S, C>(
    source: &S,
    completion: Arc<C>,
    catalog: Arc<PromptCatalog>,
    limits: ReviewLimits,
    owner: &str,
    repo: &str,
    pr_number: u64,
) -> PipelineResult<ReviewOutcome>
where
    S: SourceControl,
    C: Completion,
{
    info!("step1: fetch PR data for {owner}/{repo}#{pr_number}");
    let pr_details = source.pr_details(owner, repo, pr_number).await?;
    let diff = source.pr_diff(owner, repo, pr_number).await?;
    let files = source.pr_files(owner, repo, pr_number).await?;

    let eligible: Vec<PrFile> = files
        .into_iter()
        .filter(|f| !f.is_removed())
        .take(limits.max_files)
        .collect();
    info!("step2: reviewing {} file(s)", eligible.len());

    let reviewer = FileReviewer::new(completion.clone(), catalog.clone(), limits);
    let diff = Arc::new(diff);

    let mut file_reviews: Vec<FileReviewRecord> = Vec::with_capacity(eligible.len());
    for file in eligible {
        let task_reviewer = reviewer.clone();
        let task_diff = Arc::clone(&diff);
        let task_file = file.clone();
        let handle =
            tokio::spawn(async move { task_reviewer.review(&task_file, &task_diff).await });

        match handle.await {
            Ok(record) => file_reviews.push(record),
            Err(e) => {
                warn!(file = %file.filename, "file review task failed: {e}");
                file_reviews.push(error_placeholder_record(&file, &e.to_string()));
            }
        }
    }

    info!("step3: aggregate review");
    let overall_review =
        generate_overall_review(&*completion, &catalog, &limits, &pr_details, &file_reviews).await;
    let summary =
        generate_summary(&*completion, &catalog, &limits, &overall_review, file_reviews.len())
            .await;
    let quality_score = score::extract_quality_score(&overall_review);

    Ok(ReviewOutcome {
        pr_details,
        overall_review,
        file_reviews,
        summary,
        quality_score,
    })
}

/// Record emitted when a file's review task itself failed.
fn error_placeholder_record(file: &PrFile, error: &str) -> FileReviewRecord {
    FileReviewRecord {
        file: file.filename.clone(),
        language: detect_language(&file.filename).to_string(),
        old_code: String::new(),
        new_code: String::new(),
        code_changes: "Analysis failed".into(),
        analysis: format!("Could not analyze this file: {error}"),
        improvements: "Analysis error occurred".into(),
        changes: ChangeCounts {
            additions: file.additions,
            deletions: file.deletions,
        },
    }
}

async fn generate_overall_review<C: Completion>(
    completion: &C,
    catalog: &PromptCatalog,
    limits: &ReviewLimits,
    pr_details: &PrDetails,
    file_reviews: &[FileReviewRecord],
) -> String {
    let file_summary = file_reviews
        .iter()
        .map(|r| {
            format!(
                "- {} ({}): {} additions, {} deletions",
                r.file, r.language, r.changes.additions, r.changes.deletions
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let description = match pr_details.body.as_deref() {
        Some(body) if !body.is_empty() => truncate_chars(body, limits.max_description_chars),
        _ => "No description".to_string(),
    };

    let template = catalog.template(OVERALL_REVIEW);
    let user = render(
        &template.user_prompt,
        &[
            ("title", &pr_details.title),
            ("description", &description),
            ("file_analysis", &file_summary),
        ],
    );

    match completion.complete(&template.system_prompt, &user).await {
        Ok(text) => text,
        Err(e) => {
            warn!("overall review completion failed: {e}");
            format!(
                "## Basic PR Review\n\nPR: {}\nFiles analyzed: {}\n\nManual review recommended.",
                pr_details.title,
                file_reviews.len()
            )
        }
    }
}

async fn generate_summary<C: Completion>(
    completion: &C,
    catalog: &PromptCatalog,
    limits: &ReviewLimits,
    overall_review: &str,
    file_count: usize,
) -> String {
    let template = catalog.template(SUMMARY_GENERATION);
    let user = render(
        &template.user_prompt,
        &[
            ("overall", &truncate_chars(overall_review, limits.max_overall_chars)),
            ("file_count", &file_count.to_string()),
        ],
    );

    match completion.complete(&template.system_prompt, &user).await {
        Ok(text) => text,
        Err(e) => {
            warn!("summary completion failed: {e}");
            format!("Summary: Analyzed {file_count} files. Manual review recommended.")
        }
    }
}
