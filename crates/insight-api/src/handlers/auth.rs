//! Auth handlers — login, logout, me.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use insight_auth::SaveOutcome;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse};
use crate::error::{ApiError, validation_error};
use crate::extractors::{ClientInfo, CurrentSession, CurrentUser};
use crate::state::AppState;

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    // No Expires/Max-Age: the browser drops the cookie with the session and
    // the database row is the authority on expiry.
    Cookie::build((state.session_manager.store().cookie_name().to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.session_manager.store().cookie_secure())
        .build()
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    client: ClientInfo,
    CurrentSession(mut handle): CurrentSession,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    use validator::Validate;
    req.validate().map_err(|e| validation_error(&e))?;

    let result = state
        .session_manager
        .login(&mut handle, &req.username, &req.password, client.context())
        .await?;

    let session_expires_at = match result.outcome {
        SaveOutcome::Persisted { expires_at } => Some(expires_at),
        SaveOutcome::Cleared => None,
    };

    let jar = jar.add(session_cookie(&state, handle.token.clone()));

    Ok((
        jar,
        Json(ApiResponse::ok(LoginResponse {
            profile: result.profile,
            session_expires_at,
        })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    client: ClientInfo,
    CurrentSession(mut handle): CurrentSession,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    state
        .session_manager
        .logout(&mut handle, client.context())
        .await?;

    let mut removal = Cookie::from(state.session_manager.store().cookie_name().to_string());
    removal.set_path("/");
    let jar = jar.remove(removal);

    Ok((
        jar,
        Json(ApiResponse::ok(MessageResponse::new(
            "Logged out successfully",
        ))),
    ))
}

/// GET /api/auth/me
pub async fn me(
    user: CurrentUser,
) -> Json<ApiResponse<insight_auth::AuthProfile>> {
    Json(ApiResponse::ok(user.profile))
}
