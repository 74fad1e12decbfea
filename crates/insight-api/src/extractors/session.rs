//! Session extractors — resume the cookie-backed session and, when required,
//! the authenticated profile cached inside it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use insight_auth::{AuthProfile, SessionHandle};
use insight_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::state::AppState;

/// The session resumed from the request cookie.
///
/// Always succeeds: a missing, unknown, or expired cookie yields a fresh
/// anonymous handle.
#[derive(Debug)]
pub struct CurrentSession(pub SessionHandle);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(state.session_manager.store().cookie_name())
            .map(|cookie| cookie.value().to_string());

        let client = super::client::context_from_headers(&parts.headers);
        let handle = state
            .session_manager
            .open_session(token.as_deref(), &client)
            .await?;

        Ok(CurrentSession(handle))
    }
}

/// The authenticated user behind the request.
///
/// Rejects with 401 when the session carries no account or the cached
/// profile cannot be read back.
#[derive(Debug)]
pub struct CurrentUser {
    pub handle: SessionHandle,
    pub profile: AuthProfile,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentSession(handle) = CurrentSession::from_request_parts(parts, state).await?;

        if handle.account_id.is_none() {
            return Err(
                AppError::new(ErrorKind::InvalidCredentials, "Authentication required").into(),
            );
        }

        let data = serde_json::Value::Object(handle.data.clone());
        let profile = AuthProfile::from_session_data(&data).ok_or_else(|| {
            AppError::new(ErrorKind::InvalidCredentials, "Authentication required")
        })?;

        Ok(CurrentUser { handle, profile })
    }
}
