//! 审计快照
//!
//! 将实体序列化为 schema-less JSON 快照，过滤敏感/无意义字段后
//! 作为 old_values / new_values 存储。

use serde::Serialize;
use serde_json::{Value, json};

/// 每种实体类型要排除的字段
fn excluded_fields(entity_type: &str) -> &'static [&'static str] {
    match entity_type {
        // hash_pass 绝不能进入审计日志
        "profile" => &["id", "hash_pass"],
        _ => &["id"],
    }
}

/// 创建审计快照
///
/// 序列化失败时返回占位对象而非错误 — 审计是尽力而为的副作用。
pub fn snapshot<T: Serialize>(value: &T, entity_type: &str) -> Value {
    match serde_json::to_value(value) {
        Ok(mut v) => {
            if let Value::Object(obj) = &mut v {
                for field in excluded_fields(entity_type) {
                    obj.remove(*field);
                }
            }
            v
        }
        Err(e) => {
            tracing::error!("Failed to serialize audit snapshot: {:?}", e);
            json!({"error": "serialization_failed"})
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Profile, Role, SalaryType};

    fn profile() -> Profile {
        Profile {
            id: 99,
            email: "ana@example.com".to_string(),
            full_name: "Ana García".to_string(),
            hash_pass: "$argon2id$secret".to_string(),
            role: Role::Employee,
            salary_type: SalaryType::Hourly,
            hourly_rate: Some(15.0),
            monthly_salary: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn profile_snapshot_never_contains_hash_pass() {
        let snap = snapshot(&profile(), "profile");
        let obj = snap.as_object().unwrap();

        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("role"));
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("hash_pass"));
    }

    #[test]
    fn generic_snapshot_drops_only_id() {
        #[derive(Serialize)]
        struct Thing {
            id: i64,
            name: String,
        }

        let snap = snapshot(
            &Thing {
                id: 1,
                name: "x".into(),
            },
            "thing",
        );
        let obj = snap.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert_eq!(obj["name"], "x");
    }
}
