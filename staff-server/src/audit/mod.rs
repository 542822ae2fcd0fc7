//! 审计日志模块 — 防篡改审计追踪
//!
//! # 架构
//!
//! ```text
//! 变更操作触发
//!   └─ AuditService::log() → mpsc → AuditWorker → SQLite (audit_log 表)
//!
//! SHA256 哈希链: genesis → entry₁ → entry₂ → ... → entryₙ
//! ```
//!
//! # 保证
//!
//! - **SHA256 哈希链**: 每条记录包含前一条的哈希
//! - **Append-only**: 无删除/更新接口
//! - **尽力而为**: 审计写入失败只记录日志，绝不影响触发它的操作
//! - **链验证 API**: 可随时验证完整性

pub mod service;
pub mod snapshot;
pub mod storage;
pub mod types;
pub mod worker;

pub use service::{AuditLogRequest, AuditService};
pub use snapshot::snapshot;
pub use storage::{AuditStorage, AuditStorageError};
pub use types::{
    AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditListResponse,
    AuditQuery,
};
pub use worker::AuditWorker;
