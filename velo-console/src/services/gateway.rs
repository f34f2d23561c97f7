//! API gateway client
//!
//! Wraps all outbound HTTP: attaches the bearer token from the session
//! store and performs a one-shot transparent refresh-and-retry when the
//! server answers 401. A failed refresh clears the session store and
//! surfaces `AuthExpired`, which forces re-login.

use crate::store::SessionStore;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use velo_common::{Error, Result};

const USER_AGENT: &str = concat!("velo-console/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// HTTP gateway shared by all service clients
#[derive(Clone)]
pub struct ApiGateway {
    http: Client,
    base_url: String,
    store: SessionStore,
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send an authenticated request with one transparent refresh-and-retry
    /// on 401
    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response> {
        let response = self.dispatch(method.clone(), path, body, true).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        self.refresh_access_token().await?;
        tracing::debug!(path, "retrying request after token refresh");
        let retried = self.dispatch(method, path, body, true).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            // Fresh token rejected; nothing left to try locally
            self.store.clear().await?;
            return Err(Error::AuthExpired);
        }
        Ok(retried)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        attach_bearer: bool,
    ) -> Result<Response> {
        let mut request = self.http.request(method, self.url(path));
        if attach_bearer {
            if let Some(token) = self.store.access_token().await? {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Any failure on this path is fatal to the session: the store is
    /// cleared and the operator must log in again.
    async fn refresh_access_token(&self) -> Result<()> {
        let refresh_token = match self.store.refresh_token().await? {
            Some(token) => token,
            None => {
                self.store.clear().await?;
                return Err(Error::AuthExpired);
            }
        };

        let body = serde_json::json!({ "refresh_token": refresh_token });
        let response = self.dispatch(Method::POST, "auth/refresh", Some(&body), false).await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.json::<RefreshResponse>().await {
                Ok(refreshed) => {
                    self.store.set_access_token(&refreshed.access_token).await?;
                    tracing::info!("access token refreshed");
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!(error = %e, "malformed refresh response, clearing session");
                    self.store.clear().await?;
                    Err(Error::AuthExpired)
                }
            },
            _ => {
                tracing::warn!("token refresh rejected, clearing session");
                self.store.clear().await?;
                Err(Error::AuthExpired)
            }
        }
    }

    // ------------------------------------------------------------------
    // Typed helpers
    // ------------------------------------------------------------------

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, None).await?;
        Self::expect_json(response).await
    }

    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::expect_json(response).await
    }

    pub async fn patch(&self, path: &str) -> Result<Response> {
        self.send(Method::PATCH, path, None).await
    }

    /// Require a 2xx response and decode its JSON body
    pub async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    /// Require a 2xx response, mapping anything else to a `Service` error
    /// carrying the payload message when one is present
    pub async fn expect_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(Self::service_error(status, response).await)
    }

    async fn service_error(status: StatusCode, response: Response) -> Error {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.to_string()
                } else {
                    text.clone()
                }
            });
        Error::Service(format!("{}: {}", status.as_u16(), message))
    }
}
