//! Attendance Model

use serde::{Deserialize, Serialize};

/// Attendance record — one per check-in event
///
/// A record with `check_out` unset is an "open session". At most one
/// open session may exist per profile at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    /// Check-in instant (Unix millis)
    pub check_in: i64,
    /// Check-out instant (Unix millis), null while the session is open
    pub check_out: Option<i64>,
    /// Worked hours, derived at check-out (minute precision)
    pub total_hours: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Attendance joined with the owning profile (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceWithProfile {
    pub id: i64,
    pub user_id: i64,
    pub check_in: i64,
    pub check_out: Option<i64>,
    pub total_hours: Option<f64>,
    pub notes: Option<String>,
    pub full_name: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Check-in payload (self-service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub user_id: i64,
}

/// Check-out payload (self-service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutRequest {
    pub attendance_id: i64,
}

/// Manual attendance entry payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceCreate {
    pub user_id: i64,
    /// Check-in instant (Unix millis)
    pub check_in: i64,
    /// Optional check-out instant; when present, total_hours is derived
    pub check_out: Option<i64>,
    pub notes: Option<String>,
}
