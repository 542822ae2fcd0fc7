//! Notification API Handlers
//!
//! Notifications are immutable after creation — there are no update or
//! delete routes. Visibility is role-scoped; read receipts are per-caller.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Serialize;

use crate::audit::{AuditAction, snapshot};
use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::repository::notification;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_MESSAGE_LEN, MAX_NAME_LEN, validate_required_text,
};
use shared::models::{Notification, NotificationCreate, NotificationWithReadState};

const ENTITY: &str = "notification";

/// GET /api/notifications - 当前用户可见的通知 (含已读状态)
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<NotificationWithReadState>>> {
    let notifications =
        notification::find_visible_for(&state.pool, user.id, user.role).await?;
    Ok(Json(notifications))
}

/// POST /api/notifications - 发布通知 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<NotificationCreate>,
) -> AppResult<Json<Notification>> {
    policy::ensure_admin(&user)?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&payload.message, "message", MAX_MESSAGE_LEN)?;

    let created = notification::create(&state.pool, payload, user.id).await?;

    state
        .audit_service
        .log(
            AuditAction::CreateNotification,
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

/// Mark-read acknowledgement
#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    /// false 表示此前已读 (重复请求，幂等成功)
    pub newly_read: bool,
}

/// POST /api/notifications/{id}/read - 标记已读 (幂等)
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<MarkReadResponse>> {
    let newly_read = notification::mark_read(&state.pool, id, user.id).await?;
    Ok(Json(MarkReadResponse { newly_read }))
}
