//! 授权策略
//!
//! 所有 handler 的访问决策都经过这里的三个函数：
//!
//! - [`ensure_admin`] — 管理操作 (薪资/通知/用户的写操作、审计读取)
//! - [`ensure_self`] — 自助操作 (打卡、签退、标记已读) 只能作用于本人
//! - [`read_scope`] — 读操作的可见范围 (管理员任意过滤，员工仅本人)
//!
//! 未认证的请求在进入 handler 之前已被 `require_auth` 拒绝。

use crate::auth::CurrentUser;
use crate::utils::AppError;

/// 要求管理员角色
pub fn ensure_admin(user: &CurrentUser) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }
    Ok(())
}

/// 要求操作目标属于调用者本人
pub fn ensure_self(user: &CurrentUser, owner_id: i64) -> Result<(), AppError> {
    if user.id != owner_id {
        return Err(AppError::forbidden(
            "Operation is only allowed on your own records",
        ));
    }
    Ok(())
}

/// 读操作的用户范围
///
/// 管理员: 按请求过滤 (`None` = 查看全部)；
/// 员工: 始终限定为本人。
pub fn read_scope(user: &CurrentUser, requested_user_id: Option<i64>) -> Option<i64> {
    if user.is_admin() {
        requested_user_id
    } else {
        Some(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn user(id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            email: format!("u{id}@example.com"),
            full_name: format!("User {id}"),
            role,
        }
    }

    #[test]
    fn only_admin_passes_ensure_admin() {
        assert!(ensure_admin(&user(1, Role::Admin)).is_ok());
        assert!(ensure_admin(&user(1, Role::Employee)).is_err());
    }

    #[test]
    fn ensure_self_rejects_foreign_targets() {
        let u = user(7, Role::Employee);
        assert!(ensure_self(&u, 7).is_ok());
        assert!(ensure_self(&u, 8).is_err());
        // Admins get no special treatment on self-service operations
        let a = user(1, Role::Admin);
        assert!(ensure_self(&a, 2).is_err());
    }

    #[test]
    fn read_scope_limits_employees_to_self() {
        let e = user(5, Role::Employee);
        assert_eq!(read_scope(&e, None), Some(5));
        assert_eq!(read_scope(&e, Some(9)), Some(5));

        let a = user(1, Role::Admin);
        assert_eq!(read_scope(&a, None), None);
        assert_eq!(read_scope(&a, Some(9)), Some(9));
    }
}
