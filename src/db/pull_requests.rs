//! Database queries for pull requests.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{PrStatus, PullRequest};
use sqlx::SqliteExecutor;

const PR_COLUMNS: &str = "pull_request_id, pull_request_name, author_id, status, \
                          assigned_reviewers, created_at, merged_at";

/// Insert a new pull request. Fails with `AlreadyExists` on a duplicate ID.
pub async fn create_pr(
    executor: impl SqliteExecutor<'_>,
    pr: &PullRequest,
) -> Result<(), AppError> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO pull_requests
            (pull_request_id, pull_request_name, author_id, status, assigned_reviewers, created_at, merged_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&pr.pull_request_id)
    .bind(&pr.pull_request_name)
    .bind(&pr.author_id)
    .bind(pr.status)
    .bind(&pr.assigned_reviewers)
    .bind(pr.created_at)
    .bind(pr.merged_at)
    .execute(executor)
    .await;

    if let Err(err) = inserted {
        if crate::db::is_unique_violation(&err) {
            return Err(AppError::already_exists("PullRequest", &pr.pull_request_id));
        }
        return Err(err.into());
    }

    Ok(())
}

/// Look up a pull request by ID.
pub async fn get_pr(
    executor: impl SqliteExecutor<'_>,
    pr_id: &str,
) -> Result<Option<PullRequest>, AppError> {
    let pr = sqlx::query_as::<_, PullRequest>(&format!(
        "SELECT {} FROM pull_requests WHERE pull_request_id = ?",
        PR_COLUMNS
    ))
    .bind(pr_id)
    .fetch_optional(executor)
    .await?;

    Ok(pr)
}

/// Transition a pull request to MERGED, stamping the merge time.
pub async fn set_merged(
    executor: impl SqliteExecutor<'_>,
    pr_id: &str,
    merged_at: i64,
) -> Result<(), AppError> {
    sqlx::query("UPDATE pull_requests SET status = ?, merged_at = ? WHERE pull_request_id = ?")
        .bind(PrStatus::Merged)
        .bind(merged_at)
        .bind(pr_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Replace the stored reviewer list of a pull request.
pub async fn update_reviewers(
    executor: impl SqliteExecutor<'_>,
    pr_id: &str,
    reviewers_json: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE pull_requests SET assigned_reviewers = ? WHERE pull_request_id = ?")
        .bind(reviewers_json)
        .bind(pr_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Fetch every pull request whose reviewer list contains `user_id`.
///
/// The reviewer column is a JSON array, so membership is checked with
/// `json_each` rather than string matching.
pub async fn get_prs_by_reviewer(
    pool: &DbPool,
    user_id: &str,
) -> Result<Vec<PullRequest>, AppError> {
    let prs = sqlx::query_as::<_, PullRequest>(&format!(
        r#"
        SELECT {}
        FROM pull_requests
        WHERE EXISTS (
            SELECT 1 FROM json_each(pull_requests.assigned_reviewers)
            WHERE json_each.value = ?
        )
        ORDER BY created_at DESC, pull_request_id
        "#,
        PR_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(prs)
}
