//! Authentication Handlers
//!
//! Handles login, logout, and current-user lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde_json::json;

use crate::audit::AuditAction;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::profile;
use crate::utils::{AppError, AppResult};
use shared::models::{LoginRequest, LoginResponse, Profile};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Authenticates credentials and returns a JWT token. A unified error
/// message is used for unknown email and wrong password to prevent
/// account enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_lowercase();

    let found = profile::find_by_email(&state.pool, &email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match found {
        Some(p) => {
            if !p.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = password::verify_password(&req.password, &p.hash_pass)?;
            if !password_valid {
                state
                    .audit_service
                    .log(
                        AuditAction::LoginFailed,
                        "auth",
                        None,
                        None,
                        None,
                        None,
                        Some(json!({"email": &email, "reason": "invalid_credentials"})),
                    )
                    .await;
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            p
        }
        None => {
            state
                .audit_service
                .log(
                    AuditAction::LoginFailed,
                    "auth",
                    None,
                    None,
                    None,
                    None,
                    Some(json!({"email": &email, "reason": "user_not_found"})),
                )
                .await;
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(user.id, &user.email, &user.full_name, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    state
        .audit_service
        .log(
            AuditAction::LoginSuccess,
            "auth",
            Some(user.id),
            Some(user.id),
            Some(user.full_name.clone()),
            None,
            Some(json!({"email": &user.email})),
        )
        .await;

    tracing::info!(
        user_id = user.id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/auth/me — 当前令牌对应的最新档案
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Profile>> {
    let fresh = profile::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Profile {} not found", user.id)))?;
    Ok(Json(fresh))
}

/// POST /api/auth/logout
///
/// Token invalidation is client-side; the server records the event.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<()>> {
    state
        .audit_service
        .log(
            AuditAction::Logout,
            "auth",
            Some(user.id),
            Some(user.id),
            Some(user.full_name.clone()),
            None,
            Some(json!({"email": &user.email})),
        )
        .await;

    tracing::info!(user_id = user.id, email = %user.email, "User logged out");

    Ok(Json(()))
}
