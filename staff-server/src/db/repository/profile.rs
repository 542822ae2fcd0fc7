//! Profile Repository

use shared::models::{Profile, ProfileCreate, ProfileUpdate, SalaryType};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const PROFILE_SELECT: &str = "SELECT id, email, full_name, hash_pass, role, salary_type, hourly_rate, monthly_salary, is_active, created_at, updated_at FROM profiles";

/// Resolve the rate columns from the salary type — exactly one is populated.
fn resolve_rates(
    salary_type: SalaryType,
    hourly_rate: Option<f64>,
    monthly_salary: Option<f64>,
) -> RepoResult<(Option<f64>, Option<f64>)> {
    match salary_type {
        SalaryType::Hourly => {
            let rate = hourly_rate.ok_or_else(|| {
                RepoError::Validation("hourly_rate is required for hourly profiles".into())
            })?;
            Ok((Some(rate), None))
        }
        SalaryType::Monthly => {
            let salary = monthly_salary.ok_or_else(|| {
                RepoError::Validation("monthly_salary is required for monthly profiles".into())
            })?;
            Ok((None, Some(salary)))
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Profile>> {
    let sql = format!("{PROFILE_SELECT} WHERE id = ?");
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(profile)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Profile>> {
    let sql = format!("{PROFILE_SELECT} WHERE email = ?");
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(profile)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Profile>> {
    let sql = format!("{PROFILE_SELECT} ORDER BY created_at DESC");
    let profiles = sqlx::query_as::<_, Profile>(&sql).fetch_all(pool).await?;
    Ok(profiles)
}

pub async fn create(
    pool: &SqlitePool,
    data: ProfileCreate,
    hash_pass: String,
) -> RepoResult<Profile> {
    let (hourly_rate, monthly_salary) =
        resolve_rates(data.salary_type, data.hourly_rate, data.monthly_salary)?;

    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "A profile with email {} already exists",
            data.email
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO profiles (id, email, full_name, hash_pass, role, salary_type, hourly_rate, monthly_salary, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.email)
    .bind(&data.full_name)
    .bind(&hash_pass)
    .bind(data.role)
    .bind(data.salary_type)
    .bind(hourly_rate)
    .bind(monthly_salary)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create profile".into()))
}

/// Partial update. The salary-type invariant is re-enforced: changing
/// `salary_type` (or keeping it) always rewrites both rate columns so that
/// only the matching one is populated.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ProfileUpdate,
    new_hash: Option<String>,
) -> RepoResult<Profile> {
    let old = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Profile {id} not found")))?;

    let salary_type = data.salary_type.unwrap_or(old.salary_type);
    let (hourly_rate, monthly_salary) = resolve_rates(
        salary_type,
        data.hourly_rate.or(old.hourly_rate),
        data.monthly_salary.or(old.monthly_salary),
    )?;

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE profiles SET full_name = ?1, hash_pass = ?2, role = ?3, salary_type = ?4, hourly_rate = ?5, monthly_salary = ?6, is_active = ?7, updated_at = ?8 WHERE id = ?9",
    )
    .bind(data.full_name.as_deref().unwrap_or(&old.full_name))
    .bind(new_hash.as_deref().unwrap_or(&old.hash_pass))
    .bind(data.role.unwrap_or(old.role))
    .bind(salary_type)
    .bind(hourly_rate)
    .bind(monthly_salary)
    .bind(data.is_active.unwrap_or(old.is_active))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Profile {id} not found")))
}

/// Active employees (for dashboard stats)
pub async fn count_active_employees(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM profiles WHERE is_active = 1 AND role = 'employee'",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}
