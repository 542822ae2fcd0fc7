//! Profile Model

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compensation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    Hourly,
    Monthly,
}

/// Profile entity — one per authenticated person
///
/// Exactly one of `hourly_rate` / `monthly_salary` is populated,
/// determined by `salary_type`. Never hard-deleted (soft-deactivate via
/// `is_active`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    /// Argon2 password hash — never serialized to clients
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    pub role: Role,
    pub salary_type: SalaryType,
    pub hourly_rate: Option<f64>,
    pub monthly_salary: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create profile payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub salary_type: SalaryType,
    pub hourly_rate: Option<f64>,
    pub monthly_salary: Option<f64>,
}

/// Update profile payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub salary_type: Option<SalaryType>,
    pub hourly_rate: Option<f64>,
    pub monthly_salary: Option<f64>,
    pub is_active: Option<bool>,
}
