//! Database queries for teams and their membership.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{Team, User};
use sqlx::{Sqlite, Transaction};

/// Create a team and upsert its members, all inside one transaction.
///
/// Fails with `AlreadyExists` if the team name is taken. Members supplied
/// with the team are created, or updated and moved into this team if their
/// user ID already exists.
pub async fn create_team(pool: &DbPool, team: &Team) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query("INSERT INTO teams (team_name) VALUES (?)")
        .bind(&team.team_name)
        .execute(&mut *tx)
        .await;

    if let Err(err) = inserted {
        if crate::db::is_unique_violation(&err) {
            return Err(AppError::already_exists("Team", &team.team_name));
        }
        return Err(err.into());
    }

    for member in &team.members {
        upsert_member(&mut tx, &team.team_name, member).await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Create-or-update a member, forcing its team affiliation to `team_name`.
async fn upsert_member(
    tx: &mut Transaction<'_, Sqlite>,
    team_name: &str,
    member: &User,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, username, team_name, is_active)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            username = excluded.username,
            team_name = excluded.team_name,
            is_active = excluded.is_active
        "#,
    )
    .bind(&member.user_id)
    .bind(&member.username)
    .bind(team_name)
    .bind(member.is_active)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Get a team with its member list populated.
pub async fn get_team(pool: &DbPool, team_name: &str) -> Result<Team, AppError> {
    let exists: Option<(String,)> =
        sqlx::query_as("SELECT team_name FROM teams WHERE team_name = ?")
            .bind(team_name)
            .fetch_optional(pool)
            .await?;

    if exists.is_none() {
        return Err(AppError::not_found_with_id("Team", team_name));
    }

    let members: Vec<User> = sqlx::query_as(
        r#"
        SELECT user_id, username, team_name, is_active
        FROM users WHERE team_name = ? ORDER BY user_id
        "#,
    )
    .bind(team_name)
    .fetch_all(pool)
    .await?;

    Ok(Team {
        team_name: team_name.to_string(),
        members,
    })
}

/// Deactivate every currently-active member of a team, except the excluded IDs.
///
/// Returns the number of affected rows. A team with no matching members
/// yields 0; that is not an error.
pub async fn bulk_deactivate(
    pool: &DbPool,
    team_name: &str,
    exclude_user_ids: &[String],
) -> Result<u64, AppError> {
    let mut sql =
        String::from("UPDATE users SET is_active = 0 WHERE team_name = ? AND is_active = 1");

    if !exclude_user_ids.is_empty() {
        let placeholders = vec!["?"; exclude_user_ids.len()].join(", ");
        sql.push_str(&format!(" AND user_id NOT IN ({})", placeholders));
    }

    let mut query = sqlx::query(&sql).bind(team_name);
    for id in exclude_user_ids {
        query = query.bind(id);
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}
