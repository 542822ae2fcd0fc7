//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`attendance`] - 考勤接口 (打卡/签退/补录)
//! - [`salary`] - 薪资记录接口
//! - [`notifications`] - 通知接口
//! - [`users`] - 用户管理接口
//! - [`dashboard`] - 仪表盘聚合接口
//! - [`audit_log`] - 审计日志查询、验证

pub mod attendance;
pub mod audit_log;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod salary;
pub mod users;
