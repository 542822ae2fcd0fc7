//! Notification Model

use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Normal,
    Important,
    Urgent,
}

impl Default for NotificationPriority {
    fn default() -> Self {
        Self::Normal
    }
}

/// Audience selector on a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TargetRole {
    All,
    Employee,
    Admin,
}

impl Default for TargetRole {
    fn default() -> Self {
        Self::All
    }
}

impl TargetRole {
    /// Whether a notification with this target is visible to `role`
    pub fn matches(&self, role: Role) -> bool {
        match self {
            TargetRole::All => true,
            TargetRole::Employee => role == Role::Employee,
            TargetRole::Admin => role == Role::Admin,
        }
    }
}

/// Notification — immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub target_role: TargetRole,
    pub created_by: i64,
    pub created_at: i64,
}

/// Notification with the caller's read state joined in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct NotificationWithReadState {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub target_role: TargetRole,
    pub created_by: i64,
    pub created_at: i64,
    pub is_read: bool,
    pub read_at: Option<i64>,
}

/// Create notification payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub priority: NotificationPriority,
    #[serde(default)]
    pub target_role: TargetRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_role_visibility_matrix() {
        assert!(TargetRole::All.matches(Role::Employee));
        assert!(TargetRole::All.matches(Role::Admin));
        assert!(TargetRole::Employee.matches(Role::Employee));
        assert!(!TargetRole::Employee.matches(Role::Admin));
        assert!(TargetRole::Admin.matches(Role::Admin));
        assert!(!TargetRole::Admin.matches(Role::Employee));
    }

    #[test]
    fn create_payload_defaults_to_normal_and_all() {
        let payload: NotificationCreate =
            serde_json::from_str(r#"{"title": "t", "message": "m"}"#).unwrap();
        assert_eq!(payload.priority, NotificationPriority::Normal);
        assert_eq!(payload.target_role, TargetRole::All);
    }
}
