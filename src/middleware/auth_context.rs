use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{Authorization, authorization::Bearer};

use crate::auth::hash_session_token;
use crate::error::ApiError;
use crate::models::{AppState, Role};

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: Role,
    pub name: String,
    pub token_hash: String,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // Extract Authorization: Bearer <token>
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::session_expired())?;

            let token_hash = hash_session_token(authz.token());

            let session = state
                .store
                .find_session(&token_hash, Utc::now())
                .await
                .map_err(ApiError::from)?
                .ok_or_else(ApiError::session_expired)?;

            let user = state
                .store
                .find_user(session.user_id)
                .await
                .map_err(ApiError::from)?
                .ok_or_else(ApiError::session_expired)?;

            Ok(AuthContext {
                user_id: user.id,
                role: user.role,
                name: user.name,
                token_hash,
            })
        }
    }
}
