//! 审计日志类型定义
//!
//! 所有条目不可变、不可删除，支持 SHA256 哈希链防篡改。

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
///
/// 序列化为 snake_case 字符串，与存储的 action 列一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ 认证 ═══
    /// 登录成功
    LoginSuccess,
    /// 登录失败
    LoginFailed,
    /// 登出
    Logout,

    // ═══ 考勤 ═══
    /// 打卡上班
    CheckIn,
    /// 打卡下班
    CheckOut,
    /// 管理员手工补录
    CreateAttendance,

    // ═══ 薪资 ═══
    /// 创建薪资记录
    CreateSalary,
    /// 更新薪资记录
    UpdateSalary,
    /// 标记已支付
    MarkPaid,

    // ═══ 通知 ═══
    /// 发布通知
    CreateNotification,

    // ═══ 用户管理 ═══
    /// 创建用户
    CreateUser,
    /// 更新用户
    UpdateUser,
}

impl AuditAction {
    /// snake_case 标签，与 serde 序列化结果一致
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::LoginSuccess => "login_success",
            AuditAction::LoginFailed => "login_failed",
            AuditAction::Logout => "logout",
            AuditAction::CheckIn => "check_in",
            AuditAction::CheckOut => "check_out",
            AuditAction::CreateAttendance => "create_attendance",
            AuditAction::CreateSalary => "create_salary",
            AuditAction::UpdateSalary => "update_salary",
            AuditAction::MarkPaid => "mark_paid",
            AuditAction::CreateNotification => "create_notification",
            AuditAction::CreateUser => "create_user",
            AuditAction::UpdateUser => "update_user",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|_| ())
    }
}

/// 审计日志条目（不可变）
///
/// 每条记录包含 SHA256 哈希链:
/// - `prev_hash`: 前一条记录的哈希
/// - `curr_hash`: 当前记录的哈希（包含 prev_hash + 所有字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 全局递增序列号（唯一标识）
    pub sequence: i64,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    /// 操作类型
    pub action: AuditAction,
    /// 实体类型（如 "attendance", "salary_record"）
    pub entity_type: String,
    /// 实体 ID
    pub entity_id: Option<i64>,
    /// 操作人 ID（登录失败等场景为 None）
    pub operator_id: Option<i64>,
    /// 操作人名称
    pub operator_name: Option<String>,
    /// 变更前快照（schema-less JSON）
    pub old_values: Option<serde_json::Value>,
    /// 变更后快照（schema-less JSON）
    pub new_values: Option<serde_json::Value>,
    /// 前一条审计日志哈希
    pub prev_hash: String,
    /// 当前记录哈希（SHA256）
    pub curr_hash: String,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    /// 操作类型过滤
    pub action: Option<AuditAction>,
    /// 操作人 ID 过滤
    pub operator_id: Option<i64>,
    /// 实体类型过滤
    pub entity_type: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: i64,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            action: None,
            operator_id: None,
            entity_type: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// 审计日志列表响应
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: i64,
}

/// 审计链验证结果
#[derive(Debug, Serialize)]
pub struct AuditChainVerification {
    /// 验证的记录总数
    pub total_entries: i64,
    /// 链是否完整
    pub chain_intact: bool,
    /// 断裂点列表
    pub breaks: Vec<AuditChainBreak>,
}

/// 审计链断裂点
#[derive(Debug, Serialize)]
pub struct AuditChainBreak {
    /// 断裂处的序列号
    pub sequence: i64,
    /// 期望的哈希
    pub expected: String,
    /// 实际的哈希
    pub actual: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tags_match_serde_snake_case() {
        for action in [
            AuditAction::LoginSuccess,
            AuditAction::CheckIn,
            AuditAction::CheckOut,
            AuditAction::CreateAttendance,
            AuditAction::CreateSalary,
            AuditAction::UpdateSalary,
            AuditAction::MarkPaid,
            AuditAction::CreateNotification,
            AuditAction::CreateUser,
            AuditAction::UpdateUser,
            AuditAction::Logout,
            AuditAction::LoginFailed,
        ] {
            let serialized = serde_json::to_value(action).unwrap();
            assert_eq!(serialized, serde_json::json!(action.as_str()));
        }
    }

    #[test]
    fn action_parses_from_tag() {
        let action: AuditAction = "mark_paid".parse().unwrap();
        assert_eq!(action, AuditAction::MarkPaid);
        assert!("not_an_action".parse::<AuditAction>().is_err());
    }
}
