//! REST API routes for the review service.
//!
//! Each orchestrator operation maps to one endpoint. Errors surface as a
//! structured `{ "error": { "code", "message" } }` body with a stable code.

use crate::api::server::AppState;
use crate::error::AppError;
use crate::models::{PrStatus, PullRequest, PullRequestSummary, Team, User};
use crate::services::ReviewStats;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error payload returned to clients.
#[derive(Serialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

#[derive(Serialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

/// Wrapper to make AppError usable as an axum error response.
struct ApiErr(AppError);

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::AlreadyExists { resource, .. } => (
                StatusCode::CONFLICT,
                match resource.as_str() {
                    "Team" => "TEAM_EXISTS",
                    "User" => "USER_EXISTS",
                    "PullRequest" => "PR_EXISTS",
                    _ => "ALREADY_EXISTS",
                },
            ),
            AppError::PrMerged { .. } => (StatusCode::CONFLICT, "PR_MERGED"),
            AppError::NotAssigned { .. } => (StatusCode::CONFLICT, "NOT_ASSIGNED"),
            AppError::NoCandidate { .. } => (StatusCode::CONFLICT, "NO_CANDIDATE"),
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::Database { .. } | AppError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        (
            status,
            Json(ApiErrorResponse {
                error: ApiErrorBody {
                    code: code.to_string(),
                    message: self.0.to_string(),
                },
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

// ── Request/response types ───────────────────────────────────────────────────

/// Pull request as returned by the API, with the reviewer list parsed out of
/// its storage form.
#[derive(Serialize)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<i64>,
}

impl From<PullRequest> for PullRequestResponse {
    fn from(pr: PullRequest) -> Self {
        let assigned_reviewers = pr.reviewer_ids().unwrap_or_default();
        Self {
            pull_request_id: pr.pull_request_id,
            pull_request_name: pr.pull_request_name,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

#[derive(Serialize)]
struct TeamResponse {
    team: Team,
}

#[derive(Serialize)]
struct UserResponse {
    user: User,
}

#[derive(Serialize)]
struct PrResponse {
    pr: PullRequestResponse,
}

#[derive(Deserialize)]
struct SetUserActiveBody {
    user_id: String,
    is_active: bool,
}

#[derive(Deserialize)]
struct BulkDeactivateBody {
    team_name: String,
    #[serde(default)]
    exclude_users: Vec<String>,
}

#[derive(Serialize)]
struct BulkDeactivateResponse {
    team_name: String,
    deactivated_users: u64,
}

#[derive(Deserialize)]
struct CreatePrBody {
    pull_request_id: String,
    pull_request_name: String,
    author_id: String,
}

#[derive(Deserialize)]
struct MergePrBody {
    pull_request_id: String,
}

#[derive(Deserialize)]
struct ReassignBody {
    pull_request_id: String,
    old_user_id: String,
}

#[derive(Serialize)]
struct ReassignResponse {
    pr: PullRequestResponse,
    replaced_by: String,
}

#[derive(Serialize)]
struct UserReviewsResponse {
    user_id: String,
    pull_requests: Vec<PullRequestSummary>,
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/teams", post(create_team))
        .route("/api/teams/{team_name}", get(get_team))
        .route("/api/users", post(create_user))
        .route("/api/users/{user_id}", delete(delete_user))
        .route("/api/users/active", post(set_user_active))
        .route("/api/users/deactivate", post(bulk_deactivate))
        .route("/api/users/{user_id}/reviews", get(get_user_reviews))
        .route("/api/users/{user_id}/review-stats", get(get_user_review_stats))
        .route("/api/pull-requests", post(create_pr))
        .route("/api/pull-requests/merge", post(merge_pr))
        .route("/api/pull-requests/reassign", post(reassign_reviewer))
}

// ── Team handlers ────────────────────────────────────────────────────────────

/// POST /api/teams — create a team with its members.
async fn create_team(
    State(state): State<AppState>,
    Json(team): Json<Team>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiErr> {
    state.service.create_team(&team).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

/// GET /api/teams/:team_name — team with member list.
async fn get_team(
    State(state): State<AppState>,
    Path(team_name): Path<String>,
) -> Result<Json<TeamResponse>, ApiErr> {
    let team = state.service.get_team(&team_name).await?;
    Ok(Json(TeamResponse { team }))
}

// ── User handlers ────────────────────────────────────────────────────────────

/// POST /api/users — create a user in an existing team.
async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<(StatusCode, Json<UserResponse>), ApiErr> {
    state.service.create_user(&user).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// DELETE /api/users/:user_id — remove a user.
async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<()>, ApiErr> {
    state.service.delete_user(&user_id).await?;
    Ok(Json(()))
}

/// POST /api/users/active — set a user's active flag.
async fn set_user_active(
    State(state): State<AppState>,
    Json(body): Json<SetUserActiveBody>,
) -> Result<Json<UserResponse>, ApiErr> {
    let user = state
        .service
        .set_user_active(&body.user_id, body.is_active)
        .await?;
    Ok(Json(UserResponse { user }))
}

/// POST /api/users/deactivate — bulk-deactivate a team, minus exclusions.
async fn bulk_deactivate(
    State(state): State<AppState>,
    Json(body): Json<BulkDeactivateBody>,
) -> Result<Json<BulkDeactivateResponse>, ApiErr> {
    let affected = state
        .service
        .bulk_deactivate_users(&body.team_name, &body.exclude_users)
        .await?;
    Ok(Json(BulkDeactivateResponse {
        team_name: body.team_name,
        deactivated_users: affected,
    }))
}

/// GET /api/users/:user_id/reviews — PRs the user is assigned to review.
async fn get_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserReviewsResponse>, ApiErr> {
    let pull_requests = state.service.user_reviews(&user_id).await?;
    Ok(Json(UserReviewsResponse {
        user_id,
        pull_requests,
    }))
}

/// GET /api/users/:user_id/review-stats — review counts by status.
async fn get_user_review_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ReviewStats>, ApiErr> {
    let stats = state.service.user_review_stats(&user_id).await?;
    Ok(Json(stats))
}

// ── Pull request handlers ────────────────────────────────────────────────────

/// POST /api/pull-requests — create a PR and assign reviewers.
async fn create_pr(
    State(state): State<AppState>,
    Json(body): Json<CreatePrBody>,
) -> Result<(StatusCode, Json<PrResponse>), ApiErr> {
    let pr = state
        .service
        .create_pr(&body.pull_request_id, &body.pull_request_name, &body.author_id)
        .await?;
    Ok((StatusCode::CREATED, Json(PrResponse { pr: pr.into() })))
}

/// POST /api/pull-requests/merge — merge a PR (idempotent).
async fn merge_pr(
    State(state): State<AppState>,
    Json(body): Json<MergePrBody>,
) -> Result<Json<PrResponse>, ApiErr> {
    let pr = state.service.merge_pr(&body.pull_request_id).await?;
    Ok(Json(PrResponse { pr: pr.into() }))
}

/// POST /api/pull-requests/reassign — replace one assigned reviewer.
async fn reassign_reviewer(
    State(state): State<AppState>,
    Json(body): Json<ReassignBody>,
) -> Result<Json<ReassignResponse>, ApiErr> {
    let (pr, replaced_by) = state
        .service
        .reassign_reviewer(&body.pull_request_id, &body.old_user_id)
        .await?;
    Ok(Json(ReassignResponse {
        pr: pr.into(),
        replaced_by,
    }))
}
