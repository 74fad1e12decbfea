//! `ClientInfo` extractor — captures the caller's address and user agent.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use insight_auth::ClientContext;

/// Client attributes recorded alongside sessions and audit entries.
#[derive(Debug, Clone)]
pub struct ClientInfo(pub ClientContext);

impl ClientInfo {
    /// Returns the inner `ClientContext`.
    pub fn context(&self) -> &ClientContext {
        &self.0
    }
}

impl std::ops::Deref for ClientInfo {
    type Target = ClientContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Reads the client address and user agent from request headers.
///
/// The address comes from `x-forwarded-for` (first hop); direct socket
/// addresses are not consulted because the portal always sits behind a
/// reverse proxy.
pub(crate) fn context_from_headers(headers: &HeaderMap) -> ClientContext {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    ClientContext { ip, user_agent }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientInfo(context_from_headers(&parts.headers)))
    }
}
