//! Salary API Handlers
//!
//! All writes are admin-only; reads are scoped (admin sees all, employees
//! see their own).

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::audit::{AuditAction, snapshot};
use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::repository::{profile, salary};
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{SalaryCreate, SalaryRecord, SalaryStatus, SalaryUpdate, SalaryWithProfile};

const ENTITY: &str = "salary_record";

/// Query params for listing salary records
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<i64>,
    pub status: Option<SalaryStatus>,
}

/// GET /api/salary - 薪资记录列表
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SalaryWithProfile>>> {
    let scope = policy::read_scope(&user, query.user_id);
    let records = salary::find_filtered(&state.pool, scope, query.status).await?;
    Ok(Json(records))
}

/// POST /api/salary - 创建薪资记录 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SalaryCreate>,
) -> AppResult<Json<SalaryRecord>> {
    policy::ensure_admin(&user)?;

    time::parse_date(&payload.period_start)?;
    time::parse_date(&payload.period_end)?;
    validate_amount(payload.base_amount, "base_amount")?;
    validate_amount(payload.bonus, "bonus")?;
    validate_amount(payload.deductions, "deductions")?;
    if let Some(hours) = payload.hours_worked {
        validate_amount(hours, "hours_worked")?;
    }
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

    let record = salary::create(&state.pool, payload, user.id).await?;

    state
        .audit_service
        .log(
            AuditAction::CreateSalary,
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

/// PUT /api/salary/{id} - 部分更新 (管理员)
///
/// total_amount 总是按更新后的 base/bonus/deductions 重新计算。
/// 当本次更新将状态置为 paid 时，审计标签为 mark_paid，否则为 update_salary。
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<SalaryUpdate>,
) -> AppResult<Json<SalaryRecord>> {
    policy::ensure_admin(&user)?;

    if let Some(ref d) = payload.period_start {
        time::parse_date(d)?;
    }
    if let Some(ref d) = payload.period_end {
        time::parse_date(d)?;
    }
    if let Some(v) = payload.base_amount {
        validate_amount(v, "base_amount")?;
    }
    if let Some(v) = payload.bonus {
        validate_amount(v, "bonus")?;
    }
    if let Some(v) = payload.deductions {
        validate_amount(v, "deductions")?;
    }
    if let Some(v) = payload.hours_worked {
        validate_amount(v, "hours_worked")?;
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let old = salary::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Salary record {id} not found")))?;

    let action = if payload.status == Some(SalaryStatus::Paid) {
        AuditAction::MarkPaid
    } else {
        AuditAction::UpdateSalary
    };
    let patch = snapshot(&payload, ENTITY);

    let updated = salary::update(&state.pool, id, payload).await?;

    state
        .audit_service
        .log(
            action,
            ENTITY,
            Some(id),
            Some(user.id),
            Some(user.full_name.clone()),
            Some(snapshot(&old, ENTITY)),
            Some(patch),
        )
        .await;

    Ok(Json(updated))
}
