//! User Management Handlers (admin only — enforced by router middleware)

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::audit::{AuditAction, snapshot};
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::profile;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_amount, validate_email, validate_password, validate_required_text,
};
use crate::utils::AppResult;
use shared::models::{Profile, ProfileCreate, ProfileUpdate};

const ENTITY: &str = "profile";

/// GET /api/users - 全部用户，最新创建在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Profile>>> {
    let profiles = profile::find_all(&state.pool).await?;
    Ok(Json(profiles))
}

/// POST /api/users - 创建用户
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProfileCreate>,
) -> AppResult<Json<Profile>> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    validate_required_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    if let Some(rate) = payload.hourly_rate {
        validate_amount(rate, "hourly_rate")?;
    }
    if let Some(salary) = payload.monthly_salary {
        validate_amount(salary, "monthly_salary")?;
    }

    let hash_pass = password::hash_password(&payload.password)?;
    let mut data = payload;
    data.email = data.email.trim().to_lowercase();
    let created = profile::create(&state.pool, data, hash_pass).await?;

    state
        .audit_service
        .log(
            AuditAction::CreateUser,
            ENTITY,
            Some(created.id),
            Some(user.id),
            Some(user.full_name.clone()),
            None,
            Some(snapshot(&created, ENTITY)),
        )
        .await;

    Ok(Json(created))
}

/// PUT /api/users/{id} - 部分更新 (含可选密码重置和停用)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    if let Some(ref name) = payload.full_name {
        validate_required_text(name, "full_name", MAX_NAME_LEN)?;
    }
    if let Some(rate) = payload.hourly_rate {
        validate_amount(rate, "hourly_rate")?;
    }
    if let Some(salary) = payload.monthly_salary {
        validate_amount(salary, "monthly_salary")?;
    }

    let new_hash = match &payload.password {
        Some(p) => {
            validate_password(p)?;
            Some(password::hash_password(p)?)
        }
        None => None,
    };

    // old snapshot for the audit trail (also yields NotFound early)
    let old = profile::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| crate::utils::AppError::not_found(format!("Profile {id} not found")))?;

    let updated = profile::update(&state.pool, id, payload, new_hash).await?;

    state
        .audit_service
        .log(
            AuditAction::UpdateUser,
            ENTITY,
            Some(id),
            Some(user.id),
            Some(user.full_name.clone()),
            Some(snapshot(&old, ENTITY)),
            Some(snapshot(&updated, ENTITY)),
        )
        .await;

    Ok(Json(updated))
}
