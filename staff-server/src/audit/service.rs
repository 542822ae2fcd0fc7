//! 审计日志服务
//!
//! `AuditService` 提供：
//! - 日志写入（通过 mpsc 通道异步接收，尽力而为）
//! - 日志查询（直接读取存储）
//! - 链验证

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::mpsc;

use super::storage::{AuditStorage, AuditStorageError};
use super::types::*;

/// 发送到 AuditService 的日志请求
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

/// 审计日志服务
///
/// 通过 mpsc 通道接收日志请求，后台 worker 异步写入 SQLite。
/// 查询操作直接读取 storage。
///
/// 审计写入是尽力而为的副作用：通道或存储失败只记录日志，
/// 绝不作为触发操作的失败向调用方传播。
pub struct AuditService {
    storage: AuditStorage,
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建审计服务，返回 (service, worker 消费端)
    pub fn new(pool: SqlitePool, buffer_size: usize) -> (Arc<Self>, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let storage = AuditStorage::new(pool);
        let service = Arc::new(Self { storage, tx });
        (service, rx)
    }

    /// 异步记录审计日志（非阻塞，fire-and-forget）
    #[allow(clippy::too_many_arguments)]
    pub async fn log(
        &self,
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: Option<i64>,
        operator_id: Option<i64>,
        operator_name: Option<String>,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) {
        let req = AuditLogRequest {
            action,
            entity_type: entity_type.into(),
            entity_id,
            operator_id,
            operator_name,
            old_values,
            new_values,
        };

        if self.tx.send(req).await.is_err() {
            tracing::error!(action = %action, "Audit log channel closed — audit entry lost");
        }
    }

    /// 查询审计日志
    pub async fn query(
        &self,
        q: &AuditQuery,
    ) -> Result<(Vec<AuditEntry>, i64), AuditStorageError> {
        self.storage.query(q).await
    }

    /// 验证审计链完整性
    pub async fn verify_chain(&self) -> Result<AuditChainVerification, AuditStorageError> {
        self.storage.verify_chain().await
    }

    /// 获取存储引用
    pub fn storage(&self) -> &AuditStorage {
        &self.storage
    }
}
