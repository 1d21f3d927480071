use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub session_ttl_hours: i64,
}

/* -------------------------
   Roles
--------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Reception,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Reception => "reception",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "customer" => Some(Role::Customer),
            "reception" => Some(Role::Reception),
            "doctor" => Some(Role::Doctor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn is_staff(self) -> bool {
        !matches!(self, Role::Customer)
    }
}

/* -------------------------
   Appointment status
--------------------------*/

/// Closed status enum shared by server and client contract. Any other wire
/// value is rejected at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Waiting,
    Examining,
    Pharmacy,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Waiting => "waiting",
            AppointmentStatus::Examining => "examining",
            AppointmentStatus::Pharmacy => "pharmacy",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<AppointmentStatus> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "waiting" => Some(AppointmentStatus::Waiting),
            "examining" => Some(AppointmentStatus::Examining),
            "pharmacy" => Some(AppointmentStatus::Pharmacy),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses accept no further workflow transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

/* -------------------------
   Domain records
--------------------------*/

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub owner_name: String,
    pub phone: String,
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub weight: String,
    pub height: String,
    pub symptoms: String,
    pub appointment_date: Option<DateTime<Utc>>,
    pub time_slot: String,
    pub is_walk_in: bool,
    pub status: AppointmentStatus,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    /// Decimal kept as a string, matching the billing round-trip format.
    pub cost: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Field set for a new appointment, after validation and date normalization.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub owner_name: String,
    pub phone: String,
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub weight: String,
    pub height: String,
    pub symptoms: String,
    pub appointment_date: Option<DateTime<Utc>>,
    pub time_slot: String,
    pub is_walk_in: bool,
    pub status: AppointmentStatus,
}

/// Partial status patch: `status` always applies; the optional fields only
/// overwrite stored values when present.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPatch {
    pub status: AppointmentStatus,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub cost: Option<String>,
}

impl StatusPatch {
    pub fn status_only(status: AppointmentStatus) -> Self {
        StatusPatch {
            status,
            diagnosis: None,
            prescription: None,
            cost: None,
        }
    }
}

/// Administrative correction: any subset of the editable fields, bypassing the
/// workflow restrictions.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    pub owner_name: Option<String>,
    pub pet_name: Option<String>,
    pub time_slot: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub symptoms: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The shape users take in API responses (no credential material).
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserPublic {
    fn from(u: &User) -> Self {
        UserPublic {
            id: u.id,
            username: u.username.clone(),
            name: u.name.clone(),
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}
