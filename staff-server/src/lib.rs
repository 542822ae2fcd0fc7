//! Staff Server - 员工管理系统后端
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系, 角色授权策略
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx)
//! - **审计** (`audit`): SHA256 哈希链审计日志
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! staff-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、授权策略
//! ├── api/           # HTTP 路由和处理器
//! ├── audit/         # 审计日志
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
///
/// 必须在加载配置之前调用
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(&level, log_dir.as_deref());
}
