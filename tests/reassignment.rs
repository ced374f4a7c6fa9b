//! Reviewer reassignment and bulk deactivation tests.
//!
//! Reassignment must never introduce a duplicate reviewer, never pick the
//! author or the departing reviewer, keep the list length constant, and
//! refuse to touch merged PRs.

use review_rota::db;
use review_rota::db::pool::DbPool;
use review_rota::error::AppError;
use review_rota::models::{Team, User};
use review_rota::services::ReviewService;
use tempfile::{tempdir, TempDir};

fn member(id: &str, team: &str) -> User {
    User {
        user_id: id.to_string(),
        username: id.to_string(),
        team_name: team.to_string(),
        is_active: true,
    }
}

async fn setup(team_name: &str, member_ids: &[&str]) -> (TempDir, DbPool, ReviewService) {
    let dir = tempdir().unwrap();
    let pool = db::initialize(&dir.path().join("test.db")).await.unwrap();
    let service = ReviewService::new(pool.clone(), 2);

    let team = Team {
        team_name: team_name.to_string(),
        members: member_ids.iter().map(|id| member(id, team_name)).collect(),
    };
    service.create_team(&team).await.unwrap();

    (dir, pool, service)
}

/// Read the stored reviewer list straight from the database.
async fn stored_reviewers(pool: &DbPool, pr_id: &str) -> Vec<String> {
    let raw: (String,) = sqlx::query_as(
        "SELECT assigned_reviewers FROM pull_requests WHERE pull_request_id = ?",
    )
    .bind(pr_id)
    .fetch_one(pool)
    .await
    .unwrap();

    serde_json::from_str(&raw.0).unwrap()
}

#[tokio::test]
async fn test_reassign_picks_the_remaining_unassigned_member() {
    let (_dir, _pool, service) = setup("backend", &["a", "b", "c", "d"]).await;

    let pr = service.create_pr("pr1", "feat", "a").await.unwrap();
    let assigned = pr.reviewer_ids().unwrap();

    // Exactly one of {b, c, d} is left unassigned.
    let spare = ["b", "c", "d"]
        .iter()
        .find(|id| !assigned.contains(&id.to_string()))
        .unwrap()
        .to_string();

    let (updated, replaced_by) = service.reassign_reviewer("pr1", &assigned[0]).await.unwrap();
    assert_eq!(replaced_by, spare);

    // Positional replacement: same length, same order, one slot swapped.
    let reviewers = updated.reviewer_ids().unwrap();
    assert_eq!(reviewers, vec![spare, assigned[1].clone()]);
}

#[tokio::test]
async fn test_reassign_on_merged_pr_fails_and_leaves_list_unchanged() {
    let (_dir, pool, service) = setup("backend", &["a", "b", "c", "d"]).await;

    let pr = service.create_pr("pr1", "feat", "a").await.unwrap();
    let assigned = pr.reviewer_ids().unwrap();
    service.merge_pr("pr1").await.unwrap();

    let err = service
        .reassign_reviewer("pr1", &assigned[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PrMerged { .. }));

    assert_eq!(stored_reviewers(&pool, "pr1").await, assigned);
}

#[tokio::test]
async fn test_reassign_unknown_pr_not_found() {
    let (_dir, _pool, service) = setup("backend", &["a", "b"]).await;

    let err = service.reassign_reviewer("nope", "b").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_reassign_unassigned_reviewer_conflicts() {
    let (_dir, pool, service) = setup("backend", &["a", "b", "c", "d"]).await;

    let pr = service.create_pr("pr1", "feat", "a").await.unwrap();
    let assigned = pr.reviewer_ids().unwrap();
    let spare = ["b", "c", "d"]
        .iter()
        .find(|id| !assigned.contains(&id.to_string()))
        .unwrap()
        .to_string();

    // A teammate who was never assigned
    let err = service.reassign_reviewer("pr1", &spare).await.unwrap_err();
    assert!(matches!(err, AppError::NotAssigned { .. }));

    // An ID that matches no user at all: the membership check runs first
    let err = service.reassign_reviewer("pr1", "ghost").await.unwrap_err();
    assert!(matches!(err, AppError::NotAssigned { .. }));

    assert_eq!(stored_reviewers(&pool, "pr1").await, assigned);
}

#[tokio::test]
async fn test_reassign_team_of_two_is_structurally_blocked() {
    let (_dir, _pool, service) = setup("pair", &["a", "b"]).await;

    service.create_pr("pr1", "feat", "a").await.unwrap();

    let err = service.reassign_reviewer("pr1", "b").await.unwrap_err();
    assert!(matches!(err, AppError::NoCandidate { .. }));
}

#[tokio::test]
async fn test_reassign_team_of_three_has_no_replacement() {
    let (_dir, _pool, service) = setup("trio", &["a", "b", "c"]).await;

    // Both teammates are already assigned; nobody is left to rotate in.
    let pr = service.create_pr("pr1", "feat", "a").await.unwrap();
    let assigned = pr.reviewer_ids().unwrap();
    assert_eq!(assigned.len(), 2);

    let err = service
        .reassign_reviewer("pr1", &assigned[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoCandidate { .. }));
}

#[tokio::test]
async fn test_reassign_after_spare_deactivated_has_no_candidate() {
    let (_dir, _pool, service) = setup("backend", &["a", "b", "c", "d"]).await;

    let pr = service.create_pr("pr1", "feat", "a").await.unwrap();
    let assigned = pr.reviewer_ids().unwrap();
    let spare = ["b", "c", "d"]
        .iter()
        .find(|id| !assigned.contains(&id.to_string()))
        .unwrap()
        .to_string();

    service.set_user_active(&spare, false).await.unwrap();

    let err = service
        .reassign_reviewer("pr1", &assigned[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoCandidate { .. }));
}

#[tokio::test]
async fn test_reassign_deleted_reviewer_not_found() {
    let (_dir, _pool, service) = setup("backend", &["a", "b", "c", "d"]).await;

    let pr = service.create_pr("pr1", "feat", "a").await.unwrap();
    let assigned = pr.reviewer_ids().unwrap();

    // The reviewer vanishes from the users table but stays in the PR list.
    service.delete_user(&assigned[0]).await.unwrap();

    let err = service
        .reassign_reviewer("pr1", &assigned[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_bulk_deactivate_honors_exclusions_and_team_boundary() {
    let (_dir, _pool, service) = setup("backend", &["a", "b", "c"]).await;
    service
        .create_team(&Team {
            team_name: "frontend".to_string(),
            members: vec![member("x", "frontend"), member("y", "frontend")],
        })
        .await
        .unwrap();

    let affected = service
        .bulk_deactivate_users("backend", &["a".to_string()])
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let backend = service.get_team("backend").await.unwrap();
    for user in &backend.members {
        assert_eq!(user.is_active, user.user_id == "a");
    }

    let frontend = service.get_team("frontend").await.unwrap();
    assert!(frontend.members.iter().all(|u| u.is_active));
}

#[tokio::test]
async fn test_bulk_deactivate_already_inactive_not_counted() {
    let (_dir, _pool, service) = setup("backend", &["a", "b"]).await;

    service.set_user_active("b", false).await.unwrap();

    let affected = service.bulk_deactivate_users("backend", &[]).await.unwrap();
    assert_eq!(affected, 1);
}

#[tokio::test]
async fn test_bulk_deactivate_unknown_team_affects_nothing() {
    let (_dir, _pool, service) = setup("backend", &["a"]).await;

    let affected = service.bulk_deactivate_users("nope", &[]).await.unwrap();
    assert_eq!(affected, 0);
}
