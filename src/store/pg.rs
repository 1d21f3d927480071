//! Postgres-backed store. Schema lives in migrations/. Status and role are
//! stored as text and re-parsed at this edge so the closed enums stay the
//! only values in circulation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{
    AdminUpdate, Appointment, AppointmentStatus, NewAppointment, Role, Session, StatusPatch, User,
};

use super::{Store, StoreError};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("db error: {e}"))
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, StoreError> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| StoreError::Backend(format!("unknown role in db: {}", self.role)))?;
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            name: self.name,
            role,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: i64,
    owner_name: String,
    phone: String,
    pet_name: String,
    pet_type: String,
    breed: String,
    weight: String,
    height: String,
    symptoms: String,
    appointment_date: Option<DateTime<Utc>>,
    time_slot: String,
    is_walk_in: bool,
    status: String,
    diagnosis: Option<String>,
    prescription: Option<String>,
    cost: Option<String>,
    created_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self) -> Result<Appointment, StoreError> {
        let status = AppointmentStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Backend(format!("unknown status in db: {}", self.status)))?;
        Ok(Appointment {
            id: self.id,
            owner_name: self.owner_name,
            phone: self.phone,
            pet_name: self.pet_name,
            pet_type: self.pet_type,
            breed: self.breed,
            weight: self.weight,
            height: self.height,
            symptoms: self.symptoms,
            appointment_date: self.appointment_date,
            time_slot: self.time_slot,
            is_walk_in: self.is_walk_in,
            status,
            diagnosis: self.diagnosis,
            prescription: self.prescription,
            cost: self.cost,
            created_at: self.created_at,
        })
    }
}

const APPOINTMENT_COLS: &str = "id, owner_name, phone, pet_name, pet_type, breed, weight, height, \
     symptoms, appointment_date, time_slot, is_walk_in, status, diagnosis, prescription, cost, \
     created_at";

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let row: UserRow = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO clinic_user (username, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, name, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                StoreError::Duplicate("username".into())
            } else {
                db_err(e)
            }
        })?;
        row.into_user()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, name, role, created_at
            FROM clinic_user
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(UserRow::into_user).transpose()
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, name, role, created_at
            FROM clinic_user
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(UserRow::into_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, name, role, created_at
            FROM clinic_user
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM clinic_user WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn create_session(
        &self,
        token_hash: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO session_token (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        #[derive(sqlx::FromRow)]
        struct SessionRow {
            token_hash: String,
            user_id: i64,
            expires_at: DateTime<Utc>,
        }

        let row: Option<SessionRow> = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token_hash, user_id, expires_at
            FROM session_token
            WHERE token_hash = $1
              AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(|r| Session {
            token_hash: r.token_hash,
            user_id: r.user_id,
            expires_at: r.expires_at,
        }))
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query(r#"DELETE FROM session_token WHERE token_hash = $1"#)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            SELECT {APPOINTMENT_COLS}
            FROM appointment
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(AppointmentRow::into_appointment).collect()
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        let row: Option<AppointmentRow> = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            SELECT {APPOINTMENT_COLS}
            FROM appointment
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(AppointmentRow::into_appointment).transpose()
    }

    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let row: AppointmentRow = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            INSERT INTO appointment (
              owner_name, phone, pet_name, pet_type, breed, weight, height,
              symptoms, appointment_date, time_slot, is_walk_in, status
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
            RETURNING {APPOINTMENT_COLS}
            "#
        ))
        .bind(&new.owner_name)
        .bind(&new.phone)
        .bind(&new.pet_name)
        .bind(&new.pet_type)
        .bind(&new.breed)
        .bind(&new.weight)
        .bind(&new.height)
        .bind(&new.symptoms)
        .bind(new.appointment_date)
        .bind(&new.time_slot)
        .bind(new.is_walk_in)
        .bind(new.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        row.into_appointment()
    }

    async fn patch_appointment_status(
        &self,
        id: i64,
        patch: StatusPatch,
    ) -> Result<Appointment, StoreError> {
        // Single atomic row update; absent optional fields fall through to the
        // stored values via COALESCE.
        let row: Option<AppointmentRow> = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            UPDATE appointment
            SET status       = $2,
                diagnosis    = COALESCE($3, diagnosis),
                prescription = COALESCE($4, prescription),
                cost         = COALESCE($5, cost)
            WHERE id = $1
            RETURNING {APPOINTMENT_COLS}
            "#
        ))
        .bind(id)
        .bind(patch.status.as_str())
        .bind(patch.diagnosis)
        .bind(patch.prescription)
        .bind(patch.cost)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.ok_or(StoreError::NotFound)?.into_appointment()
    }

    async fn admin_update_appointment(
        &self,
        id: i64,
        update: AdminUpdate,
    ) -> Result<Appointment, StoreError> {
        let row: Option<AppointmentRow> = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            UPDATE appointment
            SET owner_name       = COALESCE($2, owner_name),
                pet_name         = COALESCE($3, pet_name),
                time_slot        = COALESCE($4, time_slot),
                status           = COALESCE($5, status),
                symptoms         = COALESCE($6, symptoms),
                appointment_date = COALESCE($7, appointment_date)
            WHERE id = $1
            RETURNING {APPOINTMENT_COLS}
            "#
        ))
        .bind(id)
        .bind(update.owner_name)
        .bind(update.pet_name)
        .bind(update.time_slot)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.symptoms)
        .bind(update.appointment_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.ok_or(StoreError::NotFound)?.into_appointment()
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM appointment WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
