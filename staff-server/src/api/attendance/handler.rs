//! Attendance API Handlers
//!
//! Check-in and check-out are self-service: an operator can only act on
//! their own records. Manual entry is admin-only.

use axum::{
    Json,
    extract::{Extension, Query, State},
};
use serde::Deserialize;
use serde_json::json;

use crate::audit::{AuditAction, snapshot};
use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::repository::{attendance, profile};
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Attendance, AttendanceCreate, AttendanceWithProfile, CheckInRequest, CheckOutRequest,
};

const ENTITY: &str = "attendance";

/// Query params for listing attendance
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/attendance - 考勤记录列表 (管理员可过滤任意用户，员工仅本人)
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<AttendanceWithProfile>>> {
    let tz = state.config.timezone;
    let scope = policy::read_scope(&user, query.user_id);

    let start_millis = match &query.start_date {
        Some(date) => Some(time::day_start_millis(time::parse_date(date)?, tz)),
        None => None,
    };
    let end_millis = match &query.end_date {
        Some(date) => Some(time::day_end_millis(time::parse_date(date)?, tz)),
        None => None,
    };

    let records = attendance::find_filtered(&state.pool, scope, start_millis, end_millis).await?;
    Ok(Json(records))
}

/// POST /api/attendance/check-in - 打卡上班 (仅本人)
pub async fn check_in(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CheckInRequest>,
) -> AppResult<Json<Attendance>> {
    policy::ensure_self(&user, payload.user_id)?;

    // "今天" 的边界在业务时区计算
    let tz = state.config.timezone;
    let day_start = time::day_start_millis(time::current_date(tz), tz);

    if attendance::find_open_since(&state.pool, user.id, day_start)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Already checked in"));
    }

    let record = attendance::check_in(&state.pool, user.id).await?;

    state
        .audit_service
        .log(
            AuditAction::CheckIn,
            ENTITY,
            Some(record.id),
            Some(user.id),
            Some(user.full_name.clone()),
            None,
            Some(json!({"check_in": record.check_in})),
        )
        .await;

    Ok(Json(record))
}

/// POST /api/attendance/check-out - 打卡下班 (仅本人，仅未签退的记录)
pub async fn check_out(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CheckOutRequest>,
) -> AppResult<Json<Attendance>> {
    let record = attendance::find_by_id(&state.pool, payload.attendance_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Attendance record {} not found",
                payload.attendance_id
            ))
        })?;

    policy::ensure_self(&user, record.user_id)?;

    if record.check_out.is_some() {
        return Err(AppError::conflict("Already checked out"));
    }

    let closed = attendance::close(&state.pool, record.id, record.check_in).await?;

    state
        .audit_service
        .log(
            AuditAction::CheckOut,
            ENTITY,
            Some(closed.id),
            Some(user.id),
            Some(user.full_name.clone()),
            Some(json!({"check_out": null, "total_hours": null})),
            Some(json!({"check_out": closed.check_out, "total_hours": closed.total_hours})),
        )
        .await;

    Ok(Json(closed))
}

/// POST /api/attendance - 管理员手工补录
pub async fn create_manual(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AttendanceCreate>,
) -> AppResult<Json<Attendance>> {
    policy::ensure_admin(&user)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    if profile::find_by_id(&state.pool, payload.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found(format!(
            "Profile {} not found",
            payload.user_id
        )));
    }

    let record = attendance::create_manual(&state.pool, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::CreateAttendance,
            ENTITY,
            Some(record.id),
            Some(user.id),
            Some(user.full_name.clone()),
            None,
            Some(snapshot(&record, ENTITY)),
        )
        .await;

    Ok(Json(record))
}
