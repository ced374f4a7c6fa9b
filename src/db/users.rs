//! Database queries for users.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::User;
use sqlx::SqliteExecutor;

/// Look up a user by ID. Returns `None` if absent; callers decide whether
/// that is an error.
pub async fn get_user(
    executor: impl SqliteExecutor<'_>,
    user_id: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT user_id, username, team_name, is_active FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// Create a user. Fails with `NotFound` if the target team is absent and
/// with `AlreadyExists` if the user ID is taken.
pub async fn create_user(pool: &DbPool, user: &User) -> Result<(), AppError> {
    let team: Option<(String,)> =
        sqlx::query_as("SELECT team_name FROM teams WHERE team_name = ?")
            .bind(&user.team_name)
            .fetch_optional(pool)
            .await?;

    if team.is_none() {
        return Err(AppError::not_found_with_id("Team", &user.team_name));
    }

    let inserted = sqlx::query(
        "INSERT INTO users (user_id, username, team_name, is_active) VALUES (?, ?, ?, ?)",
    )
    .bind(&user.user_id)
    .bind(&user.username)
    .bind(&user.team_name)
    .bind(user.is_active)
    .execute(pool)
    .await;

    if let Err(err) = inserted {
        if crate::db::is_unique_violation(&err) {
            return Err(AppError::already_exists("User", &user.user_id));
        }
        return Err(err.into());
    }

    Ok(())
}

/// Set a user's active flag, returning the updated row.
pub async fn update_user_active(
    pool: &DbPool,
    user_id: &str,
    is_active: bool,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET is_active = ?
        WHERE user_id = ?
        RETURNING user_id, username, team_name, is_active
        "#,
    )
    .bind(is_active)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    user.ok_or_else(|| AppError::not_found_with_id("User", user_id))
}

/// Physically delete a user. Fails with `NotFound` if nothing was deleted.
pub async fn delete_user(pool: &DbPool, user_id: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found_with_id("User", user_id));
    }

    Ok(())
}

/// Fetch the active members of a team, ordered by user ID.
///
/// An unknown team yields an empty list; reviewer selection treats that the
/// same as a team with no eligible members.
pub async fn get_active_team_members(
    executor: impl SqliteExecutor<'_>,
    team_name: &str,
) -> Result<Vec<User>, AppError> {
    let members = sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, team_name, is_active
        FROM users
        WHERE team_name = ? AND is_active = 1
        ORDER BY user_id
        "#,
    )
    .bind(team_name)
    .fetch_all(executor)
    .await?;

    Ok(members)
}
