//! Client-side state and sync. `SyncClient` owns the appointment cache and
//! drives the one subtle contract of the system: apply a mutation
//! optimistically, issue the call, then reconcile with a wholesale refetch
//! regardless of the call's outcome. No rollback and no retry: a wrong
//! optimistic guess lives only until the next successful refetch.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lifecycle;
use crate::models::{Appointment, StatusPatch};

pub mod cache;
pub mod views;

pub use cache::AppointmentCache;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Server classified the request as failed (validation, auth, conflict...).
    #[error("api error {code}: {message}")]
    Api { code: String, message: String },
    /// The call never completed.
    #[error("network error: {0}")]
    Network(String),
}

/// Booking form, matching the create-appointment wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub owner_name: String,
    pub phone: String,
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub weight: String,
    pub height: String,
    pub symptoms: String,
    pub appointment_date: Option<String>,
    pub time_slot: String,
    pub is_walk_in: bool,
}

/// Transport seam to the appointment API. An HTTP implementation lives with
/// the embedding frontend; tests drive an in-process one.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn list_appointments(&self) -> Result<Vec<Appointment>, TransportError>;
    async fn create_appointment(&self, form: &BookingForm) -> Result<Appointment, TransportError>;
    async fn update_status(&self, id: i64, patch: &StatusPatch)
    -> Result<Appointment, TransportError>;
    async fn cancel_appointment(&self, id: i64) -> Result<Appointment, TransportError>;
}

pub struct SyncClient<T: ApiTransport> {
    transport: T,
    cache: AppointmentCache,
}

impl<T: ApiTransport> SyncClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: AppointmentCache::new(),
        }
    }

    /// Read-only view for rendering. Never authoritative.
    pub fn cache(&self) -> &AppointmentCache {
        &self.cache
    }

    /// Full refetch; on success the cache is replaced wholesale.
    pub async fn refresh(&mut self) -> Result<(), TransportError> {
        let items = self.transport.list_appointments().await?;
        self.cache.replace_all(items, Utc::now());
        Ok(())
    }

    /// Reconciliation step shared by every mutation: attempt a refresh, keep
    /// the optimistic state if it fails. The next successful refresh corrects
    /// everything.
    async fn reconcile(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("reconciliation refetch failed, keeping optimistic state: {e}");
        }
    }

    pub async fn book(&mut self, form: BookingForm) -> Result<(), TransportError> {
        let now = Utc::now();
        let provisional = Appointment {
            id: 0, // assigned by insert_provisional
            owner_name: form.owner_name.clone(),
            phone: form.phone.clone(),
            pet_name: form.pet_name.clone(),
            pet_type: form.pet_type.clone(),
            breed: form.breed.clone(),
            weight: form.weight.clone(),
            height: form.height.clone(),
            symptoms: form.symptoms.clone(),
            appointment_date: lifecycle::normalize_date(
                form.appointment_date.as_deref(),
                form.is_walk_in,
                now,
            ),
            time_slot: form.time_slot.clone(),
            is_walk_in: form.is_walk_in,
            status: lifecycle::default_status(form.is_walk_in),
            diagnosis: None,
            prescription: None,
            cost: None,
            created_at: now,
        };
        self.cache.insert_provisional(provisional);

        let outcome = self.transport.create_appointment(&form).await;
        self.reconcile().await;
        outcome.map(|_| ())
    }

    pub async fn update_status(
        &mut self,
        id: i64,
        patch: StatusPatch,
    ) -> Result<(), TransportError> {
        self.cache.apply_status_patch(id, &patch);

        let outcome = self.transport.update_status(id, &patch).await;
        self.reconcile().await;
        outcome.map(|_| ())
    }

    pub async fn cancel(&mut self, id: i64) -> Result<(), TransportError> {
        self.cache.apply_status_patch(
            id,
            &StatusPatch::status_only(crate::models::AppointmentStatus::Cancelled),
        );

        let outcome = self.transport.cancel_appointment(id).await;
        self.reconcile().await;
        outcome.map(|_| ())
    }
}
