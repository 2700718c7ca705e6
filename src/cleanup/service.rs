use serde::Serialize;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{error, info};
use uuid::Uuid;

use crate::users::activity::days_until_deletion;
use crate::users::repo::{self, User};

/// Users whose countdown is inside this window are reported as at risk.
pub const WARN_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
pub struct CleanupStats {
    pub at_risk_count: usize,
    pub to_delete_count: usize,
    pub details: Vec<RetentionDetail>,
}

#[derive(Debug, Serialize)]
pub struct RetentionDetail {
    pub id: Uuid,
    pub name: String,
    pub last_activity_at: Option<OffsetDateTime>,
    pub days_inactive: i64,
    pub days_until_deletion: i64,
}

/// Users whose last activity predates `cutoff`. Users that never recorded
/// activity have a NULL column and are not considered inactive.
pub async fn find_inactive(db: &PgPool, cutoff: OffsetDateTime) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, avatar, points, theme, created_at, last_activity_at
        FROM users
        WHERE last_activity_at < $1
        ORDER BY last_activity_at ASC
        "#,
    )
    .bind(cutoff)
    .fetch_all(db)
    .await
}

/// Deletes every user inactive past the threshold, returning how many were
/// removed. Each deletion stands alone: a failure is logged and skipped so
/// one bad row cannot block the rest of the sweep.
pub async fn run_cleanup(db: &PgPool, threshold_days: i64) -> sqlx::Result<u64> {
    let cutoff = OffsetDateTime::now_utc() - Duration::days(threshold_days);
    let inactive = find_inactive(db, cutoff).await?;
    if inactive.is_empty() {
        info!("no inactive users to delete");
        return Ok(0);
    }

    let mut deleted = 0u64;
    for user in inactive {
        info!(
            user_id = %user.id,
            name = %user.name,
            last_activity_at = ?user.last_activity_at,
            "deleting inactive user"
        );
        match repo::delete(db, user.id).await {
            Ok(true) => deleted += 1,
            Ok(false) => {} // deleted concurrently, nothing to count
            Err(e) => {
                error!(user_id = %user.id, error = %e, "failed to delete inactive user");
            }
        }
    }

    info!(deleted, "cleanup completed");
    Ok(deleted)
}

/// Read-only report of who the next sweeps will touch.
pub async fn stats(db: &PgPool, threshold_days: i64) -> sqlx::Result<CleanupStats> {
    let now = OffsetDateTime::now_utc();
    let warn_cutoff = now - Duration::days(threshold_days - WARN_WINDOW_DAYS);
    let users = find_inactive(db, warn_cutoff).await?;
    Ok(bucket_users(&users, now, threshold_days))
}

/// Splits users into the warning window (`[threshold − 7, threshold)` days
/// inactive) and the overdue bucket (≥ threshold).
fn bucket_users(users: &[User], now: OffsetDateTime, threshold_days: i64) -> CleanupStats {
    let mut at_risk = Vec::new();
    let mut to_delete = Vec::new();

    for user in users {
        let Some(last) = user.last_activity_at else {
            continue;
        };
        let days_inactive = (now - last).whole_days();
        if days_inactive < threshold_days - WARN_WINDOW_DAYS {
            continue;
        }

        let detail = RetentionDetail {
            id: user.id,
            name: user.name.clone(),
            last_activity_at: user.last_activity_at,
            days_inactive,
            days_until_deletion: days_until_deletion(user.last_activity_at, now, threshold_days),
        };
        if days_inactive >= threshold_days {
            to_delete.push(detail);
        } else {
            at_risk.push(detail);
        }
    }

    let mut details = at_risk;
    let at_risk_count = details.len();
    let to_delete_count = to_delete.len();
    details.extend(to_delete);

    CleanupStats {
        at_risk_count,
        to_delete_count,
        details,
    }
}
