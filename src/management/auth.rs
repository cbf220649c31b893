use crate::{
    spotify::{ApiError, StreamingApi},
    types::{Token, TokenResponse},
};

use super::store::{KeyValueStore, StoreError};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The session: the one token pair this process acts with.
///
/// Loaded from the store at startup and written back whenever an
/// authorization or a refresh succeeds.
#[derive(Debug, Clone, Default)]
pub struct TokenManager {
    token: Option<Token>,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token: Some(token) }
    }

    /// Reads the persisted pair. A missing access token yields an empty
    /// session rather than an error: `/authorize` has simply not been used yet.
    pub async fn load(store: &impl KeyValueStore) -> Result<Self, StoreError> {
        let access_token = store.get(ACCESS_TOKEN_KEY).await?;
        let refresh_token = store.get(REFRESH_TOKEN_KEY).await?;

        Ok(Self {
            token: access_token.map(|access_token| Token {
                access_token,
                refresh_token: refresh_token.unwrap_or_default(),
            }),
        })
    }

    pub async fn persist(&self, store: &impl KeyValueStore) -> Result<(), StoreError> {
        if let Some(token) = &self.token {
            store.set(ACCESS_TOKEN_KEY, &token.access_token, None).await?;
            store.set(REFRESH_TOKEN_KEY, &token.refresh_token, None).await?;
        }
        Ok(())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.access_token.as_str())
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Completes the authorization code flow and stores both tokens.
    pub async fn authorize(
        &mut self,
        api: &impl StreamingApi,
        store: &impl KeyValueStore,
        code: &str,
    ) -> Result<TokenResponse, TokenError> {
        let response = api.exchange_code(code).await?;
        self.token = Some(Token {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token.clone().unwrap_or_default(),
        });
        self.persist(store).await?;
        Ok(response)
    }

    /// Replaces the access token using the refresh token and persists it.
    ///
    /// Spotify may hand out a new refresh token at the same time; when it
    /// does, that one is kept and stored as well.
    pub async fn refresh(
        &mut self,
        api: &impl StreamingApi,
        store: &impl KeyValueStore,
    ) -> Result<(), TokenError> {
        let refresh_token = self
            .token
            .as_ref()
            .map(|t| t.refresh_token.clone())
            .unwrap_or_default();

        let response = api.refresh_access_token(&refresh_token).await?;
        store
            .set(ACCESS_TOKEN_KEY, &response.access_token, None)
            .await?;

        let refresh_token = match response.refresh_token {
            Some(rotated) => {
                store.set(REFRESH_TOKEN_KEY, &rotated, None).await?;
                rotated
            }
            None => refresh_token,
        };

        self.token = Some(Token {
            access_token: response.access_token,
            refresh_token,
        });
        Ok(())
    }
}
