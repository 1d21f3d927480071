use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, Role, UserPublic},
    routes::ApiOk,
};

fn ensure_admin(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Only admin can manage accounts"))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{user_id}", axum::routing::delete(delete_user))
}

#[derive(Debug, Serialize)]
pub struct UsersListData {
    pub users: Vec<UserPublic>,
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<UsersListData>>, ApiError> {
    ensure_admin(&auth)?;

    let users = state
        .store
        .list_users()
        .await
        .map_err(ApiError::from)?
        .iter()
        .map(UserPublic::from)
        .collect();

    Ok(Json(ApiOk {
        data: UsersListData { users },
    }))
}

#[derive(Debug, Serialize)]
pub struct DeletedData {
    pub deleted: bool,
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiOk<DeletedData>>, ApiError> {
    ensure_admin(&auth)?;

    if user_id == auth.user_id {
        return Err(ApiError::validation("cannot delete the current account"));
    }

    state.store.delete_user(user_id).await.map_err(ApiError::from)?;

    tracing::info!(user_id, by = auth.user_id, "user deleted");
    Ok(Json(ApiOk {
        data: DeletedData { deleted: true },
    }))
}
