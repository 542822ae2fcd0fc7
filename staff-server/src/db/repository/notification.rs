//! Notification Repository

use shared::models::{Notification, NotificationCreate, NotificationWithReadState, Role};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const NOTIFICATION_SELECT: &str = "SELECT id, title, message, priority, target_role, created_by, created_at FROM notifications";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let notification = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(notification)
}

pub async fn create(
    pool: &SqlitePool,
    data: NotificationCreate,
    created_by: i64,
) -> RepoResult<Notification> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO notifications (id, title, message, priority, target_role, created_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.message)
    .bind(data.priority)
    .bind(data.target_role)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

/// Notifications visible to the caller (target_role = 'all' or the caller's
/// role), with the caller's read state joined in, newest first.
pub async fn find_visible_for(
    pool: &SqlitePool,
    user_id: i64,
    role: Role,
) -> RepoResult<Vec<NotificationWithReadState>> {
    let notifications = sqlx::query_as::<_, NotificationWithReadState>(
        "SELECT n.id, n.title, n.message, n.priority, n.target_role, n.created_by, n.created_at, r.read_at IS NOT NULL AS is_read, r.read_at FROM notifications n LEFT JOIN notification_reads r ON r.notification_id = n.id AND r.user_id = ?1 WHERE n.target_role = 'all' OR n.target_role = ?2 ORDER BY n.created_at DESC",
    )
    .bind(user_id)
    .bind(role.as_str())
    .fetch_all(pool)
    .await?;
    Ok(notifications)
}

/// Idempotent mark-as-read: a repeat request is a no-op, not an error.
/// Returns whether a new read receipt was inserted.
pub async fn mark_read(pool: &SqlitePool, notification_id: i64, user_id: i64) -> RepoResult<bool> {
    if find_by_id(pool, notification_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Notification {notification_id} not found"
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let rows = sqlx::query(
        "INSERT INTO notification_reads (id, notification_id, user_id, read_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT (notification_id, user_id) DO NOTHING",
    )
    .bind(id)
    .bind(notification_id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(rows.rows_affected() > 0)
}
