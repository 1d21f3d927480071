use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{
    client::views,
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{Appointment, AppState},
    routes::ApiOk,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/board", get(queue_board))
}

/// Public-display projection: everyone currently in the exam room plus the
/// first five waiting.
#[derive(Debug, Serialize)]
pub struct QueueBoardData {
    pub calling: Vec<Appointment>,
    pub waiting: Vec<Appointment>,
}

pub async fn queue_board(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiOk<QueueBoardData>>, ApiError> {
    if !auth.role.is_staff() {
        return Err(ApiError::forbidden("Queue board is staff-only"));
    }

    let items = state.store.list_appointments().await.map_err(ApiError::from)?;
    let board = views::queue_board(&items);

    Ok(Json(ApiOk {
        data: QueueBoardData {
            calling: board.calling.into_iter().cloned().collect(),
            waiting: board.waiting.into_iter().cloned().collect(),
        },
    }))
}
