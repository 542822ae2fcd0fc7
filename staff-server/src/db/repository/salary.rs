//! Salary Repository

use shared::models::{SalaryCreate, SalaryRecord, SalaryStatus, SalaryUpdate, SalaryWithProfile};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const SALARY_SELECT: &str = "SELECT id, user_id, period_start, period_end, base_amount, bonus, deductions, total_amount, hours_worked, status, paid_at, notes, created_by, created_at, updated_at FROM salary_records";

const SALARY_WITH_PROFILE_SELECT: &str = "SELECT s.id, s.user_id, s.period_start, s.period_end, s.base_amount, s.bonus, s.deductions, s.total_amount, s.hours_worked, s.status, s.paid_at, s.notes, s.created_by, p.full_name, p.email, s.created_at, s.updated_at FROM salary_records s JOIN profiles p ON s.user_id = p.id";

/// total_amount is always derived, never client-supplied. Deductions may
/// exceed base + bonus; the negative total is stored as-is and flagged.
fn derive_total(id: i64, base_amount: f64, bonus: f64, deductions: f64) -> f64 {
    let total = base_amount + bonus - deductions;
    if total < 0.0 {
        tracing::warn!(
            salary_id = id,
            total_amount = total,
            "Salary total is negative (deductions exceed base + bonus)"
        );
    }
    total
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<SalaryRecord>> {
    let sql = format!("{SALARY_SELECT} WHERE id = ?");
    let record = sqlx::query_as::<_, SalaryRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

pub async fn create(
    pool: &SqlitePool,
    data: SalaryCreate,
    created_by: i64,
) -> RepoResult<SalaryRecord> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let total_amount = derive_total(id, data.base_amount, data.bonus, data.deductions);

    sqlx::query(
        "INSERT INTO salary_records (id, user_id, period_start, period_end, base_amount, bonus, deductions, total_amount, hours_worked, status, paid_at, notes, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', NULL, ?10, ?11, ?12, ?12)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(&data.period_start)
    .bind(&data.period_end)
    .bind(data.base_amount)
    .bind(data.bonus)
    .bind(data.deductions)
    .bind(total_amount)
    .bind(data.hours_worked)
    .bind(&data.notes)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create salary record".into()))
}

/// Partial update. total_amount is recomputed from the effective
/// base/bonus/deductions after the patch; `paid_at` is stamped on the
/// pending → paid transition.
pub async fn update(pool: &SqlitePool, id: i64, data: SalaryUpdate) -> RepoResult<SalaryRecord> {
    let old = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Salary record {id} not found")))?;

    let base_amount = data.base_amount.unwrap_or(old.base_amount);
    let bonus = data.bonus.unwrap_or(old.bonus);
    let deductions = data.deductions.unwrap_or(old.deductions);
    let total_amount = derive_total(id, base_amount, bonus, deductions);

    let status = data.status.unwrap_or(old.status);
    let paid_at = match (old.status, status) {
        (SalaryStatus::Pending, SalaryStatus::Paid) => Some(shared::util::now_millis()),
        _ => old.paid_at,
    };

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE salary_records SET period_start = ?1, period_end = ?2, base_amount = ?3, bonus = ?4, deductions = ?5, total_amount = ?6, hours_worked = ?7, status = ?8, paid_at = ?9, notes = ?10, updated_at = ?11 WHERE id = ?12",
    )
    .bind(data.period_start.as_deref().unwrap_or(&old.period_start))
    .bind(data.period_end.as_deref().unwrap_or(&old.period_end))
    .bind(base_amount)
    .bind(bonus)
    .bind(deductions)
    .bind(total_amount)
    .bind(data.hours_worked.or(old.hours_worked))
    .bind(status)
    .bind(paid_at)
    .bind(data.notes.as_deref().or(old.notes.as_deref()))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Salary record {id} not found")))
}

/// Filtered listing with the subject profile joined, newest period first.
pub async fn find_filtered(
    pool: &SqlitePool,
    user_id: Option<i64>,
    status: Option<SalaryStatus>,
) -> RepoResult<Vec<SalaryWithProfile>> {
    let mut conditions = Vec::new();
    if user_id.is_some() {
        conditions.push("s.user_id = ?");
    }
    if status.is_some() {
        conditions.push("s.status = ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let sql = format!("{SALARY_WITH_PROFILE_SELECT}{where_clause} ORDER BY s.period_start DESC");

    let mut query = sqlx::query_as::<_, SalaryWithProfile>(&sql);
    if let Some(uid) = user_id {
        query = query.bind(uid);
    }
    if let Some(st) = status {
        query = query.bind(st);
    }

    let records = query.fetch_all(pool).await?;
    Ok(records)
}

/// Pending records count (dashboard)
pub async fn count_pending(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM salary_records WHERE status = 'pending'",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}
