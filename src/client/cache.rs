//! Client-side appointment cache. A transient, disposable copy of the server
//! list: optimistic mutations land here first so views re-render without
//! waiting on the network, and every reconciliation replaces it wholesale.
//! Business logic must never treat it as authoritative.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Appointment, StatusPatch};

#[derive(Debug, Default)]
pub struct AppointmentCache {
    items: Vec<Appointment>,
    last_synced_at: Option<DateTime<Utc>>,
    next_provisional_id: i64,
}

impl AppointmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Appointment] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&Appointment> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// Stale until the first successful sync, and again once `max_age` has
    /// passed since the last one.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.last_synced_at {
            None => true,
            Some(at) => now - at > max_age,
        }
    }

    /// Optimistic local status patch, same partial semantics as the server:
    /// absent optional fields keep their cached values.
    pub fn apply_status_patch(&mut self, id: i64, patch: &StatusPatch) {
        if let Some(a) = self.items.iter_mut().find(|a| a.id == id) {
            a.status = patch.status;
            if let Some(d) = &patch.diagnosis {
                a.diagnosis = Some(d.clone());
            }
            if let Some(p) = &patch.prescription {
                a.prescription = Some(p.clone());
            }
            if let Some(c) = &patch.cost {
                a.cost = Some(c.clone());
            }
        }
    }

    /// Optimistic insert for a booking that has not round-tripped yet. The
    /// record gets a negative placeholder id; the next successful
    /// reconciliation replaces it with the server-assigned row.
    pub fn insert_provisional(&mut self, mut appointment: Appointment) -> i64 {
        self.next_provisional_id -= 1;
        appointment.id = self.next_provisional_id;
        let id = appointment.id;
        self.items.insert(0, appointment);
        id
    }

    /// Wholesale reconciliation: local state is discarded, not merged.
    pub fn replace_all(&mut self, items: Vec<Appointment>, now: DateTime<Utc>) {
        self.items = items;
        self.last_synced_at = Some(now);
    }
}
