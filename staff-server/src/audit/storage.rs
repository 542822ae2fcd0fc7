//! 审计日志 SQLite 存储层
//!
//! Append-only 设计，没有任何删除/更新接口。
//! SHA256 哈希链确保防篡改。

use std::sync::Arc;

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;

use super::types::{
    AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditQuery,
};

/// 存储错误
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for AuditStorageError {
    fn from(err: sqlx::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

impl From<AuditStorageError> for crate::utils::AppError {
    fn from(err: AuditStorageError) -> Self {
        crate::utils::AppError::internal(err.to_string())
    }
}

const AUDIT_SELECT: &str = "SELECT sequence, timestamp, action, entity_type, entity_id, operator_id, operator_name, old_values, new_values, prev_hash, curr_hash FROM audit_log";

/// SQLite 行 (JSON 列为原始文本)
#[derive(Debug, Clone, sqlx::FromRow)]
struct AuditRow {
    sequence: i64,
    timestamp: i64,
    action: String,
    entity_type: String,
    entity_id: Option<i64>,
    operator_id: Option<i64>,
    operator_name: Option<String>,
    old_values: Option<String>,
    new_values: Option<String>,
    prev_hash: String,
    curr_hash: String,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = AuditStorageError;

    fn try_from(r: AuditRow) -> Result<Self, Self::Error> {
        let action: AuditAction =
            serde_json::from_value(serde_json::Value::String(r.action))?;
        let old_values = r.old_values.as_deref().map(serde_json::from_str).transpose()?;
        let new_values = r.new_values.as_deref().map(serde_json::from_str).transpose()?;

        Ok(AuditEntry {
            sequence: r.sequence,
            timestamp: r.timestamp,
            action,
            entity_type: r.entity_type,
            entity_id: r.entity_id,
            operator_id: r.operator_id,
            operator_name: r.operator_name,
            old_values,
            new_values,
            prev_hash: r.prev_hash,
            curr_hash: r.curr_hash,
        })
    }
}

/// 审计日志存储 (SQLite)
///
/// Append-only 设计：
/// - 仅提供 `append`、`query` 和 `verify_chain`
/// - 没有 delete/update 接口
/// - SHA256 哈希链确保完整性
#[derive(Clone)]
pub struct AuditStorage {
    pool: SqlitePool,
    /// 序列化所有 append 操作，防止 read-modify-write 竞争
    append_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AuditStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            append_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// 追加一条审计日志
    ///
    /// 1. 查询当前最大序列号和 last_hash
    /// 2. 计算新条目的哈希
    /// 3. 写入条目
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        &self,
        action: AuditAction,
        entity_type: String,
        entity_id: Option<i64>,
        operator_id: Option<i64>,
        operator_name: Option<String>,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) -> AuditStorageResult<AuditEntry> {
        // 序列化：防止并发 append 导致 sequence 冲突
        let _guard = self.append_lock.lock().await;

        // 1. 读取当前最大序列号和 last_hash
        let last = sqlx::query_as::<_, (i64, String)>(
            "SELECT sequence, curr_hash FROM audit_log ORDER BY sequence DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let (sequence, prev_hash) = match last {
            Some((seq, hash)) => (seq + 1, hash),
            None => (1, "genesis".to_string()),
        };

        // 2. 计算哈希（所有存储字段参与，JSON 以存储文本形式参与）
        let timestamp = shared::util::now_millis();
        let old_json = old_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let new_json = new_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let curr_hash = compute_audit_hash(
            &prev_hash,
            sequence,
            timestamp,
            &action,
            &entity_type,
            entity_id,
            operator_id,
            operator_name.as_deref(),
            old_json.as_deref(),
            new_json.as_deref(),
        );

        // 3. 写入
        sqlx::query(
            "INSERT INTO audit_log (sequence, timestamp, action, entity_type, entity_id, operator_id, operator_name, old_values, new_values, prev_hash, curr_hash) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(sequence)
        .bind(timestamp)
        .bind(action.as_str())
        .bind(&entity_type)
        .bind(entity_id)
        .bind(operator_id)
        .bind(&operator_name)
        .bind(&old_json)
        .bind(&new_json)
        .bind(&prev_hash)
        .bind(&curr_hash)
        .execute(&self.pool)
        .await?;

        Ok(AuditEntry {
            sequence,
            timestamp,
            action,
            entity_type,
            entity_id,
            operator_id,
            operator_name,
            old_values,
            new_values,
            prev_hash,
            curr_hash,
        })
    }

    /// 查询审计日志 (倒序 + 总数)
    pub async fn query(&self, q: &AuditQuery) -> AuditStorageResult<(Vec<AuditEntry>, i64)> {
        let mut conditions = Vec::new();
        if q.from.is_some() {
            conditions.push("timestamp >= ?");
        }
        if q.to.is_some() {
            conditions.push("timestamp <= ?");
        }
        if q.action.is_some() {
            conditions.push("action = ?");
        }
        if q.operator_id.is_some() {
            conditions.push("operator_id = ?");
        }
        if q.entity_type.is_some() {
            conditions.push("entity_type = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_log{where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(from) = q.from {
            count_query = count_query.bind(from);
        }
        if let Some(to) = q.to {
            count_query = count_query.bind(to);
        }
        if let Some(action) = q.action {
            count_query = count_query.bind(action.as_str());
        }
        if let Some(operator_id) = q.operator_id {
            count_query = count_query.bind(operator_id);
        }
        if let Some(ref entity_type) = q.entity_type {
            count_query = count_query.bind(entity_type.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let select_sql = format!(
            "{AUDIT_SELECT}{where_clause} ORDER BY sequence DESC LIMIT ? OFFSET ?"
        );
        let mut select_query = sqlx::query_as::<_, AuditRow>(&select_sql);
        if let Some(from) = q.from {
            select_query = select_query.bind(from);
        }
        if let Some(to) = q.to {
            select_query = select_query.bind(to);
        }
        if let Some(action) = q.action {
            select_query = select_query.bind(action.as_str());
        }
        if let Some(operator_id) = q.operator_id {
            select_query = select_query.bind(operator_id);
        }
        if let Some(ref entity_type) = q.entity_type {
            select_query = select_query.bind(entity_type.as_str());
        }
        let rows = select_query
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&self.pool)
            .await?;

        let entries = rows
            .into_iter()
            .map(AuditEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((entries, total))
    }

    /// 验证审计链完整性
    ///
    /// 顺序遍历所有条目：
    /// - 每条的 prev_hash 必须等于前一条的 curr_hash
    /// - 每条的 curr_hash 必须等于按存储字段重新计算的哈希
    pub async fn verify_chain(&self) -> AuditStorageResult<AuditChainVerification> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!("{AUDIT_SELECT} ORDER BY sequence ASC"))
            .fetch_all(&self.pool)
            .await?;

        let mut breaks = Vec::new();
        let mut expected_prev = "genesis".to_string();

        for row in &rows {
            if row.prev_hash != expected_prev {
                breaks.push(AuditChainBreak {
                    sequence: row.sequence,
                    expected: expected_prev.clone(),
                    actual: row.prev_hash.clone(),
                });
            }

            let action: AuditAction = match row.action.parse() {
                Ok(a) => a,
                Err(_) => {
                    // 无法识别的 action 文本本身就是篡改的信号
                    breaks.push(AuditChainBreak {
                        sequence: row.sequence,
                        expected: "<valid action tag>".to_string(),
                        actual: row.action.clone(),
                    });
                    expected_prev = row.curr_hash.clone();
                    continue;
                }
            };

            let recomputed = compute_audit_hash(
                &row.prev_hash,
                row.sequence,
                row.timestamp,
                &action,
                &row.entity_type,
                row.entity_id,
                row.operator_id,
                row.operator_name.as_deref(),
                row.old_values.as_deref(),
                row.new_values.as_deref(),
            );
            if recomputed != row.curr_hash {
                breaks.push(AuditChainBreak {
                    sequence: row.sequence,
                    expected: recomputed,
                    actual: row.curr_hash.clone(),
                });
            }

            expected_prev = row.curr_hash.clone();
        }

        Ok(AuditChainVerification {
            total_entries: rows.len() as i64,
            chain_intact: breaks.is_empty(),
            breaks,
        })
    }
}

/// 计算审计条目的 SHA256 哈希
///
/// 所有存储字段参与哈希，任何修改都会导致不匹配。
///
/// 设计要点：
/// - 变长字段间用 `\x00` 分隔，防止 `("ab","cd")` 与 `("abc","d")` 碰撞
/// - 定长字段（i64）用 LE 字节序，无需分隔
/// - Optional 字段用 `\x00`=None / `\x01`+bytes 区分，避免 None 与 Some("") 碰撞
/// - action 使用 snake_case 标签（跨版本稳定），而非 Debug trait
/// - JSON 快照以存储的文本形式参与，验证时无需重新序列化
#[allow(clippy::too_many_arguments)]
fn compute_audit_hash(
    prev_hash: &str,
    sequence: i64,
    timestamp: i64,
    action: &AuditAction,
    entity_type: &str,
    entity_id: Option<i64>,
    operator_id: Option<i64>,
    operator_name: Option<&str>,
    old_values: Option<&str>,
    new_values: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();

    // 链接前一条哈希
    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    // 定长字段
    hasher.update(sequence.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());

    // action — snake_case 标签 (与 DB 存储一致)
    hasher.update(action.as_str().as_bytes());
    hasher.update(b"\x00");

    // 变长字符串字段 — 分隔符隔离
    hasher.update(entity_type.as_bytes());
    hasher.update(b"\x00");

    // Optional 字段 — tag byte 区分 None/Some
    hash_optional_i64(&mut hasher, entity_id);
    hash_optional_i64(&mut hasher, operator_id);
    hash_optional(&mut hasher, operator_name);
    hash_optional(&mut hasher, old_values);
    hash_optional(&mut hasher, new_values);

    format!("{:x}", hasher.finalize())
}

/// Optional 字符串哈希：`\x00` = None, `\x01` + bytes + `\x00` = Some
fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

/// Optional i64 哈希：`\x00` = None, `\x01` + LE bytes = Some
fn hash_optional_i64(hasher: &mut Sha256, value: Option<i64>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.to_le_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }

    #[tokio::test]
    async fn append_chains_hashes_from_genesis() {
        let storage = AuditStorage::new(test_pool().await);

        let first = storage
            .append(
                AuditAction::CheckIn,
                "attendance".into(),
                Some(1),
                Some(10),
                Some("Ana".into()),
                None,
                Some(json!({"check_in": 1000})),
            )
            .await
            .expect("append");
        assert_eq!(first.sequence, 1);
        assert_eq!(first.prev_hash, "genesis");

        let second = storage
            .append(
                AuditAction::CheckOut,
                "attendance".into(),
                Some(1),
                Some(10),
                Some("Ana".into()),
                Some(json!({"check_out": null})),
                Some(json!({"check_out": 2000})),
            )
            .await
            .expect("append");
        assert_eq!(second.sequence, 2);
        assert_eq!(second.prev_hash, first.curr_hash);
    }

    #[tokio::test]
    async fn query_filters_by_action_and_counts() {
        let storage = AuditStorage::new(test_pool().await);
        for _ in 0..3 {
            storage
                .append(AuditAction::CheckIn, "attendance".into(), None, Some(1), None, None, None)
                .await
                .expect("append");
        }
        storage
            .append(AuditAction::MarkPaid, "salary_record".into(), None, Some(2), None, None, None)
            .await
            .expect("append");

        let (all, total) = storage.query(&AuditQuery::default()).await.expect("query");
        assert_eq!(total, 4);
        assert_eq!(all.len(), 4);
        // newest first
        assert_eq!(all[0].action, AuditAction::MarkPaid);

        let (filtered, total) = storage
            .query(&AuditQuery {
                action: Some(AuditAction::CheckIn),
                ..Default::default()
            })
            .await
            .expect("query");
        assert_eq!(total, 3);
        assert!(filtered.iter().all(|e| e.action == AuditAction::CheckIn));
    }

    #[tokio::test]
    async fn verify_chain_detects_tampering() {
        let storage = AuditStorage::new(test_pool().await);
        for i in 0..3 {
            storage
                .append(
                    AuditAction::CreateSalary,
                    "salary_record".into(),
                    Some(i),
                    Some(1),
                    None,
                    None,
                    Some(json!({"base_amount": 1000.0 + i as f64})),
                )
                .await
                .expect("append");
        }

        let verification = storage.verify_chain().await.expect("verify");
        assert!(verification.chain_intact);
        assert_eq!(verification.total_entries, 3);

        // Tamper with a stored snapshot behind the storage API's back
        sqlx::query("UPDATE audit_log SET new_values = ? WHERE sequence = 2")
            .bind(r#"{"base_amount":9999.0}"#)
            .execute(&storage.pool)
            .await
            .expect("tamper");

        let verification = storage.verify_chain().await.expect("verify");
        assert!(!verification.chain_intact);
        assert!(verification.breaks.iter().any(|b| b.sequence == 2));
    }
}
