use crate::db::DbPool;
use crate::error::AppError;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::sync::Arc;
use tastecheck_core::Actor;

use super::db::get_user_from_token;

const SESSION_COOKIE: &str = "session";

/// The authenticated caller. Rejects with 401 when no valid session is
/// presented.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(AppError::Unauthenticated)?;

        let pool = Arc::<DbPool>::from_ref(state);
        let mut conn = pool.get().map_err(|e| AppError::Pool(e.to_string()))?;

        let user = get_user_from_token(&mut conn, token)?.ok_or(AppError::Unauthenticated)?;

        match user.actor() {
            Some(actor) => Ok(AuthUser(actor)),
            None => {
                tracing::warn!(user_id = user.id, role = %user.role, "user has an unknown role");
                Err(AppError::Unauthenticated)
            }
        }
    }
}

/// Session token from `Authorization: Bearer ..`, falling back to the
/// `session` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        return value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|t| !t.is_empty())
}
