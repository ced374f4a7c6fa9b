//! Review orchestration service.
//!
//! Composes the persistence gateway and the selection engine into the PR
//! lifecycle operations: creation with random reviewer assignment, merging,
//! mid-review reviewer reassignment, and review listings/stats.
//!
//! Every PR-mutating operation runs its read-compute-write cycle inside a
//! single transaction; an early error return drops the transaction and rolls
//! it back, so a failed validation never leaves a partial write behind.

use crate::db;
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{PrStatus, PullRequest, PullRequestSummary, Team, User};
use crate::services::selection;
use chrono::Utc;
use serde::Serialize;

/// Review counts for one user, split by PR status.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStats {
    pub user_id: String,
    pub total_reviews: usize,
    pub open_reviews: usize,
    pub completed_reviews: usize,
}

/// Orchestrates team, user, and pull request operations.
#[derive(Clone)]
pub struct ReviewService {
    pool: DbPool,
    /// Reviewer-slot cap applied at PR creation.
    max_reviewers: usize,
}

impl ReviewService {
    pub fn new(pool: DbPool, max_reviewers: usize) -> Self {
        Self {
            pool,
            max_reviewers,
        }
    }

    // ── Teams & users ────────────────────────────────────────────────────

    /// Create a team and upsert its members.
    pub async fn create_team(&self, team: &Team) -> Result<(), AppError> {
        db::teams::create_team(&self.pool, team).await?;
        log::info!(
            "created team {} with {} members",
            team.team_name,
            team.members.len()
        );
        Ok(())
    }

    /// Get a team with its member list.
    pub async fn get_team(&self, team_name: &str) -> Result<Team, AppError> {
        db::teams::get_team(&self.pool, team_name).await
    }

    /// Create a single user in an existing team.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        db::users::create_user(&self.pool, user).await
    }

    /// Physically delete a user.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        db::users::delete_user(&self.pool, user_id).await
    }

    /// Set a user's active flag. Idempotent; returns the updated user.
    pub async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, AppError> {
        db::users::update_user_active(&self.pool, user_id, is_active).await
    }

    /// Deactivate a team's active members, keeping the excluded IDs active.
    /// Returns the number of users affected.
    pub async fn bulk_deactivate_users(
        &self,
        team_name: &str,
        exclude_user_ids: &[String],
    ) -> Result<u64, AppError> {
        let affected = db::teams::bulk_deactivate(&self.pool, team_name, exclude_user_ids).await?;
        log::info!("deactivated {} users in team {}", affected, team_name);
        Ok(affected)
    }

    // ── Pull request lifecycle ───────────────────────────────────────────

    /// Create a pull request and randomly assign reviewers from the author's
    /// team.
    ///
    /// The candidate pool is the team's active members minus the author. If
    /// fewer candidates exist than the configured slot count, fewer reviewers
    /// are assigned; zero reviewers is a valid outcome.
    pub async fn create_pr(
        &self,
        pr_id: &str,
        pr_name: &str,
        author_id: &str,
    ) -> Result<PullRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        if db::pull_requests::get_pr(&mut *tx, pr_id).await?.is_some() {
            return Err(AppError::already_exists("PullRequest", pr_id));
        }

        let author = db::users::get_user(&mut *tx, author_id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("User", author_id))?;

        let members = db::users::get_active_team_members(&mut *tx, &author.team_name).await?;
        let candidates = selection::filter_eligible(members, author_id);
        let reviewers =
            selection::select_reviewers(&mut rand::thread_rng(), &candidates, self.max_reviewers);

        let pr = PullRequest {
            pull_request_id: pr_id.to_string(),
            pull_request_name: pr_name.to_string(),
            author_id: author_id.to_string(),
            status: PrStatus::Open,
            assigned_reviewers: serde_json::to_string(&reviewers)?,
            created_at: Utc::now().timestamp(),
            merged_at: None,
        };

        db::pull_requests::create_pr(&mut *tx, &pr).await?;
        tx.commit().await?;

        log::info!("created PR {} with reviewers {:?}", pr_id, reviewers);
        Ok(pr)
    }

    /// Merge a pull request.
    ///
    /// Idempotent: merging an already-merged PR returns the stored row
    /// untouched, keeping the original merge timestamp.
    pub async fn merge_pr(&self, pr_id: &str) -> Result<PullRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut pr = db::pull_requests::get_pr(&mut *tx, pr_id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("PullRequest", pr_id))?;

        if pr.is_merged() {
            return Ok(pr);
        }

        let merged_at = Utc::now().timestamp();
        db::pull_requests::set_merged(&mut *tx, pr_id, merged_at).await?;
        tx.commit().await?;

        pr.status = PrStatus::Merged;
        pr.merged_at = Some(merged_at);

        log::info!("merged PR {}", pr_id);
        Ok(pr)
    }

    /// Replace one assigned reviewer with a randomly chosen teammate.
    ///
    /// Only valid pre-merge. The replacement is drawn from the departing
    /// reviewer's current active team roster, excluding the author, the
    /// departing reviewer, and everyone already assigned; the list keeps its
    /// length and order. Returns the updated PR and the new reviewer's ID.
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_user_id: &str,
    ) -> Result<(PullRequest, String), AppError> {
        let mut tx = self.pool.begin().await?;

        let mut pr = db::pull_requests::get_pr(&mut *tx, pr_id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("PullRequest", pr_id))?;

        if pr.is_merged() {
            return Err(AppError::pr_merged(pr_id));
        }

        let current = pr.reviewer_ids().map_err(|e| {
            AppError::internal(format!("corrupt reviewer list on PR {}: {}", pr_id, e))
        })?;

        if !current.iter().any(|r| r == old_user_id) {
            return Err(AppError::not_assigned(pr_id, old_user_id));
        }

        let old_user = db::users::get_user(&mut *tx, old_user_id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("User", old_user_id))?;

        let roster = db::users::get_active_team_members(&mut *tx, &old_user.team_name).await?;

        // Structural guard: raw active head-count, before any filtering. A
        // team of two cannot lose a reviewer without breaking the
        // no-self-review / no-duplicate rules.
        if roster.len() <= 2 {
            return Err(AppError::no_candidate(&old_user.team_name));
        }

        let candidates = selection::filter_reassignment_candidates(
            roster,
            &current,
            &pr.author_id,
            old_user_id,
        );

        let replacement = selection::select_replacement(&mut rand::thread_rng(), &candidates)
            .ok_or_else(|| AppError::no_candidate(&old_user.team_name))?;
        let new_user_id = replacement.user_id.clone();

        let updated = selection::replace_reviewer(&current, old_user_id, &new_user_id);
        pr.assigned_reviewers = serde_json::to_string(&updated)?;

        db::pull_requests::update_reviewers(&mut *tx, pr_id, &pr.assigned_reviewers).await?;
        tx.commit().await?;

        log::info!(
            "reassigned reviewer {} -> {} on PR {}",
            old_user_id,
            new_user_id,
            pr_id
        );
        Ok((pr, new_user_id))
    }

    // ── Review listings ──────────────────────────────────────────────────

    /// List every PR where the user appears as an assigned reviewer.
    ///
    /// An unknown user yields an empty list rather than `NotFound`: the
    /// query is keyed on reviewer-list membership only.
    pub async fn user_reviews(&self, user_id: &str) -> Result<Vec<PullRequestSummary>, AppError> {
        let prs = db::pull_requests::get_prs_by_reviewer(&self.pool, user_id).await?;
        Ok(prs.into_iter().map(PullRequestSummary::from).collect())
    }

    /// Review counts for one user, derived from the same reviewer query.
    pub async fn user_review_stats(&self, user_id: &str) -> Result<ReviewStats, AppError> {
        let prs = db::pull_requests::get_prs_by_reviewer(&self.pool, user_id).await?;

        let total = prs.len();
        let open = prs
            .iter()
            .filter(|pr| pr.status == PrStatus::Open)
            .count();

        Ok(ReviewStats {
            user_id: user_id.to_string(),
            total_reviews: total,
            open_reviews: open,
            completed_reviews: total - open,
        })
    }
}
