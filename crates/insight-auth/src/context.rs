//! Per-request client metadata.

/// Client metadata captured from the incoming request and recorded on
/// session rows and auth log entries.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    /// Remote client IP, if known.
    pub ip: Option<String>,
    /// Client `User-Agent` header, if present.
    pub user_agent: Option<String>,
}

impl ClientContext {
    /// Creates a context with both fields populated.
    pub fn new(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            user_agent: Some(user_agent.into()),
        }
    }
}
