use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{AdminUpdate, Appointment, NewAppointment, Role, Session, StatusPatch, User};

pub mod memory;
pub mod pg;

pub use memory::MemStore;
pub use pg::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate {0}")]
    Duplicate(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Durable storage for users, sessions and appointments. The Postgres
/// implementation backs production; the in-memory one backs tests and
/// DB-less local runs.
#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> Result<User, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn delete_user(&self, id: i64) -> Result<(), StoreError>;

    // sessions
    async fn create_session(
        &self,
        token_hash: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    async fn find_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError>;
    async fn revoke_session(&self, token_hash: &str) -> Result<(), StoreError>;

    // appointments
    /// All appointments, newest created first.
    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError>;
    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError>;
    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError>;
    /// Partial patch: status always applied; diagnosis/prescription/cost only
    /// when present.
    async fn patch_appointment_status(
        &self,
        id: i64,
        patch: StatusPatch,
    ) -> Result<Appointment, StoreError>;
    async fn admin_update_appointment(
        &self,
        id: i64,
        update: AdminUpdate,
    ) -> Result<Appointment, StoreError>;
    async fn delete_appointment(&self, id: i64) -> Result<(), StoreError>;
}
