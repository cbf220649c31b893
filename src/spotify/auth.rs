use reqwest::Url;

use crate::types::TokenResponse;

use super::{ApiError, SpotifyClient, client::error_message};

/// Permissions requested during authorization: read the playing track, save
/// it to the library, edit private playlists.
pub const SCOPES: [&str; 3] = [
    "user-read-currently-playing",
    "user-library-modify",
    "playlist-modify-private",
];

/// Opaque state sent with every authorization request.
pub const AUTHORIZE_STATE: &str = "state_init";

impl SpotifyClient {
    /// Builds the accounts URL the user opens to grant [`SCOPES`].
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.authorize_url(AUTHORIZE_STATE)?;
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn authorize_url(&self, state: &str) -> Result<Url, ApiError> {
        let scope = SCOPES.join(" ");
        let request = self
            .http
            .get(&self.auth_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_url.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ])
            .build()?;

        Ok(request.url().clone())
    }

    /// Exchanges the authorization code delivered to `/callback` for a token
    /// pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ApiError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_url.as_str()),
        ])
        .await
    }

    /// Trades the refresh token for a fresh access token.
    ///
    /// The response only carries a `refresh_token` when Spotify rotated it.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, ApiError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(ApiError::Exchange(message));
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}
