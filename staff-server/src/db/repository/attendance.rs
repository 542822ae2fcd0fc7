//! Attendance Repository

use shared::models::{Attendance, AttendanceCreate, AttendanceWithProfile};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const ATTENDANCE_SELECT: &str = "SELECT id, user_id, check_in, check_out, total_hours, notes, created_at, updated_at FROM attendance";

const ATTENDANCE_WITH_PROFILE_SELECT: &str = "SELECT a.id, a.user_id, a.check_in, a.check_out, a.total_hours, a.notes, p.full_name, p.email, a.created_at, a.updated_at FROM attendance a JOIN profiles p ON a.user_id = p.id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Attendance>> {
    let sql = format!("{ATTENDANCE_SELECT} WHERE id = ?");
    let record = sqlx::query_as::<_, Attendance>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// The caller's open session started at or after `day_start`, if any
pub async fn find_open_since(
    pool: &SqlitePool,
    user_id: i64,
    day_start: i64,
) -> RepoResult<Option<Attendance>> {
    let sql = format!(
        "{ATTENDANCE_SELECT} WHERE user_id = ?1 AND check_in >= ?2 AND check_out IS NULL LIMIT 1"
    );
    let record = sqlx::query_as::<_, Attendance>(&sql)
        .bind(user_id)
        .bind(day_start)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// Open a new session (check-in). The open-session uniqueness is
/// double-guarded: the caller pre-checks for today, and the partial unique
/// index rejects a second open row outright (surfaced as `Duplicate`).
pub async fn check_in(pool: &SqlitePool, user_id: i64) -> RepoResult<Attendance> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO attendance (id, user_id, check_in, check_out, total_hours, notes, created_at, updated_at) VALUES (?1, ?2, ?3, NULL, NULL, NULL, ?3, ?3)",
    )
    .bind(id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attendance record".into()))
}

/// Close an open session (check-out), deriving total_hours.
///
/// Ownership and existence are the handler's concern; this only guards the
/// open → closed transition. A lost race surfaces as `Duplicate`
/// (row already closed) via the `check_out IS NULL` guard.
pub async fn close(pool: &SqlitePool, id: i64, check_in: i64) -> RepoResult<Attendance> {
    let now = shared::util::now_millis();
    let total_hours = shared::util::elapsed_hours(check_in, now);

    let rows = sqlx::query(
        "UPDATE attendance SET check_out = ?1, total_hours = ?2, updated_at = ?1 WHERE id = ?3 AND check_out IS NULL",
    )
    .bind(now)
    .bind(total_hours)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Duplicate(format!(
            "Attendance {id} is already checked out"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Attendance {id} not found")))
}

/// Manual entry (admin). When `check_out` is supplied, total_hours is
/// derived with the same elapsed-hours function as check-out.
pub async fn create_manual(pool: &SqlitePool, data: AttendanceCreate) -> RepoResult<Attendance> {
    let total_hours = match data.check_out {
        Some(out) => {
            if out <= data.check_in {
                return Err(RepoError::Validation(
                    "check_out must be after check_in".into(),
                ));
            }
            Some(shared::util::elapsed_hours(data.check_in, out))
        }
        None => None,
    };

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO attendance (id, user_id, check_in, check_out, total_hours, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(data.check_in)
    .bind(data.check_out)
    .bind(total_hours)
    .bind(&data.notes)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attendance record".into()))
}

/// Filtered listing with the owning profile joined, newest first.
pub async fn find_filtered(
    pool: &SqlitePool,
    user_id: Option<i64>,
    start_millis: Option<i64>,
    end_millis: Option<i64>,
) -> RepoResult<Vec<AttendanceWithProfile>> {
    let mut conditions = Vec::new();
    if user_id.is_some() {
        conditions.push("a.user_id = ?");
    }
    if start_millis.is_some() {
        conditions.push("a.check_in >= ?");
    }
    if end_millis.is_some() {
        conditions.push("a.check_in < ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let sql = format!("{ATTENDANCE_WITH_PROFILE_SELECT}{where_clause} ORDER BY a.check_in DESC");

    let mut query = sqlx::query_as::<_, AttendanceWithProfile>(&sql);
    if let Some(uid) = user_id {
        query = query.bind(uid);
    }
    if let Some(start) = start_millis {
        query = query.bind(start);
    }
    if let Some(end) = end_millis {
        query = query.bind(end);
    }

    let records = query.fetch_all(pool).await?;
    Ok(records)
}

/// Sum of closed-session hours for a user in [start, end)
pub async fn sum_hours_between(
    pool: &SqlitePool,
    user_id: i64,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<f64> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(total_hours), 0.0) FROM attendance WHERE user_id = ?1 AND check_in >= ?2 AND check_in < ?3",
    )
    .bind(user_id)
    .bind(start_millis)
    .bind(end_millis)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Sum of closed-session hours across all users in [start, end)
pub async fn sum_all_hours_between(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<f64> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(total_hours), 0.0) FROM attendance WHERE check_in >= ?1 AND check_in < ?2",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Distinct users with a check-in at or after `day_start` (dashboard)
pub async fn count_checked_in_since(pool: &SqlitePool, day_start: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT user_id) FROM attendance WHERE check_in >= ?",
    )
    .bind(day_start)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// The caller's most recent record with check_in at or after `day_start`
pub async fn find_latest_since(
    pool: &SqlitePool,
    user_id: i64,
    day_start: i64,
) -> RepoResult<Option<Attendance>> {
    let sql = format!(
        "{ATTENDANCE_SELECT} WHERE user_id = ?1 AND check_in >= ?2 ORDER BY check_in DESC LIMIT 1"
    );
    let record = sqlx::query_as::<_, Attendance>(&sql)
        .bind(user_id)
        .bind(day_start)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}
