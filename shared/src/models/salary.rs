//! Salary Record Model

use serde::{Deserialize, Serialize};

/// Payment status of a salary record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SalaryStatus {
    Pending,
    Paid,
}

impl Default for SalaryStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Salary record — one per pay period per profile
///
/// `total_amount = base_amount + bonus - deductions`, recomputed on every
/// update; clients never supply it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalaryRecord {
    pub id: i64,
    pub user_id: i64,
    /// Period start date (YYYY-MM-DD)
    pub period_start: String,
    /// Period end date (YYYY-MM-DD)
    pub period_end: String,
    pub base_amount: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub total_amount: f64,
    pub hours_worked: Option<f64>,
    pub status: SalaryStatus,
    /// Stamped when status transitions to `paid` (Unix millis)
    pub paid_at: Option<i64>,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Salary record joined with the subject profile (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalaryWithProfile {
    pub id: i64,
    pub user_id: i64,
    pub period_start: String,
    pub period_end: String,
    pub base_amount: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub total_amount: f64,
    pub hours_worked: Option<f64>,
    pub status: SalaryStatus,
    pub paid_at: Option<i64>,
    pub notes: Option<String>,
    pub created_by: i64,
    pub full_name: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create salary record payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryCreate {
    pub user_id: i64,
    pub period_start: String,
    pub period_end: String,
    pub base_amount: f64,
    #[serde(default)]
    pub bonus: f64,
    #[serde(default)]
    pub deductions: f64,
    pub hours_worked: Option<f64>,
    pub notes: Option<String>,
}

/// Update salary record payload (admin, partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryUpdate {
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub base_amount: Option<f64>,
    pub bonus: Option<f64>,
    pub deductions: Option<f64>,
    pub hours_worked: Option<f64>,
    pub status: Option<SalaryStatus>,
    pub notes: Option<String>,
}
