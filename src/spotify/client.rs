use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::{
    config::Settings,
    types::{ApiErrorResponse, AuthErrorResponse},
};

use super::ApiError;

/// Upper bound for a single request, connect to last byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest based client for the Web API and the accounts service.
///
/// Holds no token: the session passes one into every user-scoped call.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    pub(crate) http: Client,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_url: String,
    pub(crate) api_url: String,
    pub(crate) auth_url: String,
    pub(crate) token_url: String,
}

impl SpotifyClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        Self::with_timeout(settings, REQUEST_TIMEOUT)
    }

    /// Like [`SpotifyClient::new`], with a custom per-request timeout. A call
    /// that runs out of time fails with [`ApiError::Http`].
    pub fn with_timeout(settings: &Settings, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_url: settings.redirect_url(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            auth_url: settings.auth_url.clone(),
            token_url: settings.token_url.clone(),
        })
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{uri}{path}", uri = self.api_url, path = path)
    }
}

/// Passes successful responses through and turns everything else into an
/// [`ApiError`] carrying Spotify's own error message.
pub(crate) async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

/// Extracts the human readable message from a Web API or accounts error body.
///
/// ```
/// let msg = error_message(r#"{"error":{"status":401,"message":"The access token expired"}}"#);
/// assert_eq!(msg.as_deref(), Some("The access token expired"));
/// ```
pub fn error_message(body: &str) -> Option<String> {
    if let Ok(api) = serde_json::from_str::<ApiErrorResponse>(body) {
        return Some(api.error.message);
    }

    serde_json::from_str::<AuthErrorResponse>(body)
        .ok()
        .map(|auth| match auth.error_description {
            Some(description) => format!("{}: {}", auth.error, description),
            None => auth.error,
        })
}
