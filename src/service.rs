use std::path::Path;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::gmail_api::auth::{self, OAuthConfig};
use crate::gmail_api::token_store::{Token, TokenStore};

/// Authenticated handle to one user's mailbox.
///
/// Calls are issued one at a time. The handle can be reused for any number
/// of sequential calls but is not meant to be shared by concurrent callers.
pub struct Service {
    client: reqwest::Client,
    oauth: OAuthConfig,
    store: TokenStore,
    token: Mutex<Token>,
    config: ServiceConfig,
}

impl Service {
    /// Builds a handle from a credentials file and the cached token.
    ///
    /// Fails with [`Error::TokenNotFound`] if no token is cached at
    /// `config.token_path`, run [`crate::setup_gmail_service`] first.
    pub async fn new<S: AsRef<str>>(
        credentials_path: impl AsRef<Path>,
        scopes: &[S],
        config: ServiceConfig,
    ) -> Result<Self> {
        let oauth = OAuthConfig::from_file(credentials_path, scopes).await?;
        let store = TokenStore::new(&config.token_path);
        let token = store
            .load()
            .await?
            .ok_or_else(|| Error::TokenNotFound(config.token_path.clone()))?;

        Ok(Self::with_parts(reqwest::Client::new(), oauth, store, token, config))
    }

    pub fn with_parts(
        client: reqwest::Client,
        oauth: OAuthConfig,
        store: TokenStore,
        token: Token,
        config: ServiceConfig,
    ) -> Self {
        Self {
            client,
            oauth,
            store,
            token: Mutex::new(token),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// `{api_base}/users/{user_id}/{path}`
    pub(crate) fn user_url(&self, path: &str) -> String {
        format!(
            "{}/users/{}/{}",
            self.config.api_base, self.config.user_id, path
        )
    }

    // Refreshes and re-caches the token first if it has expired
    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_expired() && token.refresh_token.is_some() {
            debug!("access token expired, refreshing");
            let refreshed = auth::refresh_token(&self.client, &self.oauth, &token).await?;
            self.store.save(&refreshed).await?;
            *token = refreshed;
        }
        Ok(token.access_token.clone())
    }

    pub(crate) async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        debug!("{method} {url}");
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Sends the request and decodes a JSON body, mapping non-2xx responses to [`Error::Api`].
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_response(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(Error::Api { status, body })
}
