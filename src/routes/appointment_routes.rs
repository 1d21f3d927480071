use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    lifecycle,
    middleware::auth_context::AuthContext,
    models::{
        AdminUpdate, Appointment, AppointmentStatus, AppState, NewAppointment, StatusPatch,
    },
    routes::ApiOk,
};

fn ensure_staff(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.role.is_staff() {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Customers cannot change appointment status",
        ))
    }
}

fn ensure_admin(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.role == crate::models::Role::Admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin role required"))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route(
            "/{id}",
            get(get_appointment)
                .put(admin_update_appointment)
                .delete(delete_appointment),
        )
        .route("/{id}/status", put(update_status))
        .route("/{id}/cancel", post(cancel_appointment))
}

/* ============================================================
   GET /appointments
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<ApiOk<Vec<Appointment>>>, ApiError> {
    // Full list, newest created first. Filtering is the view layer's job.
    let items = state.store.list_appointments().await.map_err(ApiError::from)?;
    Ok(Json(ApiOk { data: items }))
}

/* ============================================================
   GET /appointments/{id}
   ============================================================ */

pub async fn get_appointment(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let appt = state
        .store
        .find_appointment(id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("appointment"))?;
    Ok(Json(ApiOk { data: appt }))
}

/* ============================================================
   POST /appointments (booking and walk-in intake)
   ============================================================ */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub owner_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub pet_name: String,
    pub pet_type: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    pub symptoms: String,
    /// Raw date string; malformed input is normalized, never an error.
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub is_walk_in: Option<bool>,
}

pub async fn create_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    lifecycle::validate_new_appointment(&req.owner_name, &req.pet_name, &req.pet_type, &req.symptoms)?;

    let is_walk_in = req.is_walk_in.unwrap_or(false);
    let status = lifecycle::default_status(is_walk_in);
    let appointment_date =
        lifecycle::normalize_date(req.appointment_date.as_deref(), is_walk_in, Utc::now());

    let new = NewAppointment {
        owner_name: req.owner_name.trim().to_string(),
        phone: req.phone.unwrap_or_default(),
        pet_name: req.pet_name.trim().to_string(),
        pet_type: req.pet_type.trim().to_string(),
        breed: req.breed.unwrap_or_default(),
        weight: req.weight.unwrap_or_default(),
        height: req.height.unwrap_or_default(),
        symptoms: req.symptoms.trim().to_string(),
        appointment_date,
        time_slot: req.time_slot.unwrap_or_default(),
        is_walk_in,
        status,
    };

    let appt = state
        .store
        .create_appointment(new)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(
        appointment_id = appt.id,
        by = auth.user_id,
        walk_in = is_walk_in,
        "appointment created"
    );
    Ok(Json(ApiOk { data: appt }))
}

/* ============================================================
   PUT /appointments/{id}/status (workflow step)
   ============================================================ */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Status arrives as a string so unknown values map to VALIDATION_ERROR
    /// instead of a generic body-decode rejection.
    pub status: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub prescription: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
}

pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    ensure_staff(&auth)?;

    let target = AppointmentStatus::parse(&req.status)
        .ok_or_else(|| ApiError::validation(format!("invalid status: {}", req.status)))?;

    let current = state
        .store
        .find_appointment(id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("appointment"))?;

    lifecycle::check_transition(current.status, target)?;

    let patch = StatusPatch {
        status: target,
        diagnosis: req.diagnosis,
        prescription: req.prescription,
        cost: req.cost,
    };

    let updated = state
        .store
        .patch_appointment_status(id, patch)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(
        appointment_id = id,
        by = auth.user_id,
        from = current.status.as_str(),
        to = target.as_str(),
        "status updated"
    );
    Ok(Json(ApiOk { data: updated }))
}

/* ============================================================
   POST /appointments/{id}/cancel (customer-reachable)
   ============================================================ */

pub async fn cancel_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let current = state
        .store
        .find_appointment(id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("appointment"))?;

    lifecycle::check_cancel(current.status)?;

    let updated = state
        .store
        .patch_appointment_status(id, StatusPatch::status_only(AppointmentStatus::Cancelled))
        .await
        .map_err(ApiError::from)?;

    tracing::info!(appointment_id = id, by = auth.user_id, "appointment cancelled");
    Ok(Json(ApiOk { data: updated }))
}

/* ============================================================
   PUT /appointments/{id} (admin correction, bypasses workflow)
   ============================================================ */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateRequest {
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub pet_name: Option<String>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<String>,
}

pub async fn admin_update_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<AdminUpdateRequest>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    ensure_admin(&auth)?;

    let status = match req.status.as_deref() {
        None => None,
        Some(s) => Some(
            AppointmentStatus::parse(s)
                .ok_or_else(|| ApiError::validation(format!("invalid status: {s}")))?,
        ),
    };

    // Admin edits are deliberate; an unparsable date here is an input error,
    // not something to silently normalize away.
    let appointment_date = match req.appointment_date.as_deref() {
        None => None,
        Some(raw) => Some(
            lifecycle::normalize_date(Some(raw), false, Utc::now())
                .ok_or_else(|| ApiError::validation(format!("invalid appointmentDate: {raw}")))?,
        ),
    };

    let update = AdminUpdate {
        owner_name: req.owner_name,
        pet_name: req.pet_name,
        time_slot: req.time_slot,
        status,
        symptoms: req.symptoms,
        appointment_date,
    };

    let updated = state
        .store
        .admin_update_appointment(id, update)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(appointment_id = id, by = auth.user_id, "admin update applied");
    Ok(Json(ApiOk { data: updated }))
}

/* ============================================================
   DELETE /appointments/{id} (admin override)
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct DeletedData {
    pub deleted: bool,
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiOk<DeletedData>>, ApiError> {
    ensure_admin(&auth)?;

    state
        .store
        .delete_appointment(id)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(appointment_id = id, by = auth.user_id, "appointment deleted");
    Ok(Json(ApiOk {
        data: DeletedData { deleted: true },
    }))
}
