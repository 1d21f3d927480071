//! In-memory store. Supports tests and STORE=memory local runs without a
//! database. Same record semantics as the Postgres store, including the
//! partial-patch behavior.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{AdminUpdate, Appointment, NewAppointment, Role, Session, StatusPatch, User};

use super::{Store, StoreError};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    appointments: Vec<Appointment>,
    sessions: HashMap<String, Session>,
    next_user_id: i64,
    next_appointment_id: i64,
}

pub struct MemStore {
    inner: RwLock<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let mut g = self.inner.write().await;
        if g.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate("username".into()));
        }
        g.next_user_id += 1;
        let user = User {
            id: g.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            role,
            created_at: Utc::now(),
        };
        g.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let g = self.inner.read().await;
        Ok(g.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let g = self.inner.read().await;
        Ok(g.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let g = self.inner.read().await;
        let mut users = g.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let mut g = self.inner.write().await;
        let before = g.users.len();
        g.users.retain(|u| u.id != id);
        if g.users.len() == before {
            return Err(StoreError::NotFound);
        }
        g.sessions.retain(|_, s| s.user_id != id);
        Ok(())
    }

    async fn create_session(
        &self,
        token_hash: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut g = self.inner.write().await;
        g.sessions.insert(
            token_hash.to_string(),
            Session {
                token_hash: token_hash.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn find_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        let g = self.inner.read().await;
        Ok(g.sessions
            .get(token_hash)
            .filter(|s| s.expires_at > now)
            .cloned())
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<(), StoreError> {
        let mut g = self.inner.write().await;
        g.sessions.remove(token_hash);
        Ok(())
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let g = self.inner.read().await;
        let mut items = g.appointments.clone();
        // Newest created first; id breaks ties from same-instant creations.
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        let g = self.inner.read().await;
        Ok(g.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let mut g = self.inner.write().await;
        g.next_appointment_id += 1;
        let appt = Appointment {
            id: g.next_appointment_id,
            owner_name: new.owner_name,
            phone: new.phone,
            pet_name: new.pet_name,
            pet_type: new.pet_type,
            breed: new.breed,
            weight: new.weight,
            height: new.height,
            symptoms: new.symptoms,
            appointment_date: new.appointment_date,
            time_slot: new.time_slot,
            is_walk_in: new.is_walk_in,
            status: new.status,
            diagnosis: None,
            prescription: None,
            cost: None,
            created_at: Utc::now(),
        };
        g.appointments.push(appt.clone());
        Ok(appt)
    }

    async fn patch_appointment_status(
        &self,
        id: i64,
        patch: StatusPatch,
    ) -> Result<Appointment, StoreError> {
        let mut g = self.inner.write().await;
        let appt = g
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        appt.status = patch.status;
        if let Some(d) = patch.diagnosis {
            appt.diagnosis = Some(d);
        }
        if let Some(p) = patch.prescription {
            appt.prescription = Some(p);
        }
        if let Some(c) = patch.cost {
            appt.cost = Some(c);
        }
        Ok(appt.clone())
    }

    async fn admin_update_appointment(
        &self,
        id: i64,
        update: AdminUpdate,
    ) -> Result<Appointment, StoreError> {
        let mut g = self.inner.write().await;
        let appt = g
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(v) = update.owner_name {
            appt.owner_name = v;
        }
        if let Some(v) = update.pet_name {
            appt.pet_name = v;
        }
        if let Some(v) = update.time_slot {
            appt.time_slot = v;
        }
        if let Some(v) = update.status {
            appt.status = v;
        }
        if let Some(v) = update.symptoms {
            appt.symptoms = v;
        }
        if let Some(v) = update.appointment_date {
            appt.appointment_date = Some(v);
        }
        Ok(appt.clone())
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), StoreError> {
        let mut g = self.inner.write().await;
        let before = g.appointments.len();
        g.appointments.retain(|a| a.id != id);
        if g.appointments.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
