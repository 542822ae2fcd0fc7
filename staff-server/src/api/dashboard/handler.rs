//! Dashboard Handlers
//!
//! Read-only projections — nothing here is persisted.

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::Serialize;

use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::repository::{attendance, profile, salary};
use crate::utils::time;
use crate::utils::{AppError, AppResult};
use shared::models::{Attendance, SalaryType};

/// 员工个人汇总
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// 今天的考勤记录 (如有)
    pub today_attendance: Option<Attendance>,
    /// 本月已结算工时
    pub month_hours: f64,
    /// 预估薪资: hourly → 本月工时 × 时薪, monthly → 固定月薪
    pub estimated_salary: f64,
}

/// GET /api/dashboard/summary - 当前用户的个人汇总
pub async fn summary(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<SummaryResponse>> {
    let tz = state.config.timezone;
    let today = time::current_date(tz);
    let day_start = time::day_start_millis(today, tz);
    let (month_start, month_end) = time::month_bounds_millis(today, tz);

    let today_attendance = attendance::find_latest_since(&state.pool, user.id, day_start).await?;
    let month_hours = attendance::sum_hours_between(&state.pool, user.id, month_start, month_end)
        .await?;

    let caller = profile::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Profile {} not found", user.id)))?;

    let estimated_salary = match caller.salary_type {
        SalaryType::Hourly => {
            shared::util::round2(month_hours * caller.hourly_rate.unwrap_or(0.0))
        }
        SalaryType::Monthly => caller.monthly_salary.unwrap_or(0.0),
    };

    Ok(Json(SummaryResponse {
        today_attendance,
        month_hours,
        estimated_salary,
    }))
}

/// 管理员全员统计
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_employees: i64,
    pub active_today: i64,
    pub pending_salaries: i64,
    pub total_hours_this_month: f64,
}

/// GET /api/dashboard/stats - 全员统计 (管理员)
pub async fn stats(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<StatsResponse>> {
    policy::ensure_admin(&user)?;

    let tz = state.config.timezone;
    let today = time::current_date(tz);
    let day_start = time::day_start_millis(today, tz);
    let (month_start, month_end) = time::month_bounds_millis(today, tz);

    let total_employees = profile::count_active_employees(&state.pool).await?;
    let active_today = attendance::count_checked_in_since(&state.pool, day_start).await?;
    let pending_salaries = salary::count_pending(&state.pool).await?;
    let total_hours_this_month =
        attendance::sum_all_hours_between(&state.pool, month_start, month_end).await?;

    Ok(Json(StatsResponse {
        total_employees,
        active_today,
        pending_salaries,
        total_hours_this_month,
    }))
}
