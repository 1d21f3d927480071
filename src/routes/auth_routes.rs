use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{generate_session_token, hash_password, hash_session_token, verify_password},
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, Role, UserPublic},
    routes::ApiOk,
    store::StoreError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let u = username.trim();
    if u.is_empty() {
        return Err(ApiError::validation("username is required"));
    }
    if u.len() < 3 {
        return Err(ApiError::validation("username must be at least 3 characters"));
    }
    Ok(())
}

fn validate_password(pw: &str) -> Result<(), ApiError> {
    if pw.len() < 6 {
        return Err(ApiError::validation("password must be at least 6 characters"));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    Ok(())
}

/* ============================================================
   POST /auth/register
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    /// Defaults to customer when absent.
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterData {
    pub user: UserPublic,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiOk<RegisterData>>, ApiError> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;
    validate_name(&req.name)?;

    let role = match req.role.as_deref() {
        None | Some("") => Role::Customer,
        Some(r) => Role::parse(r).ok_or_else(|| ApiError::validation("unknown role"))?,
    };

    let password_hash = hash_password(&req.password).map_err(ApiError::Internal)?;

    let user = state
        .store
        .create_user(req.username.trim(), &password_hash, req.name.trim(), role)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => {
                ApiError::Conflict("USERNAME_TAKEN", "Username is already in use".into())
            }
            other => ApiError::from(other),
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "registered");
    Ok(Json(ApiOk {
        data: RegisterData {
            user: UserPublic::from(&user),
        },
    }))
}

/* ============================================================
   POST /auth/login
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserPublic,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiOk<LoginData>>, ApiError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("username and password are required"));
    }

    let user = state
        .store
        .find_user_by_username(username)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(ApiError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!(username = %username, "login failed");
        return Err(ApiError::invalid_credentials());
    }

    let access_token = generate_session_token();
    let token_hash = hash_session_token(&access_token);
    let expires_at = Utc::now() + Duration::hours(state.session_ttl_hours);

    state
        .store
        .create_session(&token_hash, user.id, expires_at)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(user_id = user.id, "login ok");
    Ok(Json(ApiOk {
        data: LoginData {
            access_token,
            expires_at,
            user: UserPublic::from(&user),
        },
    }))
}

/* ============================================================
   GET /auth/me, POST /auth/logout
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct MeData {
    pub user: UserPublic,
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<MeData>>, ApiError> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(ApiError::session_expired)?;

    Ok(Json(ApiOk {
        data: MeData {
            user: UserPublic::from(&user),
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct OkData {
    pub ok: bool,
}

pub async fn logout(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<OkData>>, ApiError> {
    state
        .store
        .revoke_session(&auth.token_hash)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiOk {
        data: OkData { ok: true },
    }))
}
