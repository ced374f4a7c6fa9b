//! Pull request model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status of a pull request. One-way transition: OPEN -> MERGED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Merged => write!(f, "MERGED"),
        }
    }
}

/// A pull request with its assigned reviewers.
///
/// Note: `assigned_reviewers` is stored as a JSON array of user IDs in a
/// TEXT column; use [`PullRequest::reviewer_ids`] to read it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PullRequest {
    pub pull_request_id: String,

    pub pull_request_name: String,

    /// Authoring user (foreign key to `users`). Never in the reviewer list.
    pub author_id: String,

    pub status: PrStatus,

    /// JSON array of reviewer user IDs, in assignment order.
    pub assigned_reviewers: String,

    /// Creation timestamp (Unix seconds).
    pub created_at: i64,

    /// Merge timestamp (Unix seconds). Set exactly once, on merge.
    pub merged_at: Option<i64>,
}

impl PullRequest {
    /// Parse the reviewer list from its JSON column.
    ///
    /// Errors on a corrupt stored list; callers translate that into an
    /// internal error rather than silently losing reviewers.
    pub fn reviewer_ids(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.assigned_reviewers)
    }

    /// Check if the PR has been merged.
    pub fn is_merged(&self) -> bool {
        match self.status {
            PrStatus::Merged => true,
            PrStatus::Open => false,
        }
    }
}

/// Short projection of a pull request for review listings.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestSummary {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
}

impl From<PullRequest> for PullRequestSummary {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.pull_request_id,
            pull_request_name: pr.pull_request_name,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pr(reviewers: &str) -> PullRequest {
        PullRequest {
            pull_request_id: "pr-1".to_string(),
            pull_request_name: "Add search".to_string(),
            author_id: "u1".to_string(),
            status: PrStatus::Open,
            assigned_reviewers: reviewers.to_string(),
            created_at: 1_700_000_000,
            merged_at: None,
        }
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&PrStatus::Open).unwrap(), "\"OPEN\"");
        assert_eq!(
            serde_json::from_str::<PrStatus>("\"MERGED\"").unwrap(),
            PrStatus::Merged
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PrStatus::Open.to_string(), "OPEN");
        assert_eq!(PrStatus::Merged.to_string(), "MERGED");
    }

    #[test]
    fn test_reviewer_ids_parses_list() {
        let pr = sample_pr(r#"["u2","u3"]"#);
        assert_eq!(pr.reviewer_ids().unwrap(), vec!["u2", "u3"]);
    }

    #[test]
    fn test_reviewer_ids_rejects_corrupt_column() {
        let pr = sample_pr("not json");
        assert!(pr.reviewer_ids().is_err());
    }

    #[test]
    fn test_summary_projection() {
        let summary = PullRequestSummary::from(sample_pr("[]"));
        assert_eq!(summary.pull_request_id, "pr-1");
        assert_eq!(summary.status, PrStatus::Open);
    }
}
