//! Authentication client

use crate::services::gateway::ApiGateway;
use serde::Deserialize;
use velo_common::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "userId", default)]
    pub user_id: i64,
}

/// Login client; token refresh is handled transparently by the gateway
pub struct AuthClient<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> AuthClient<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Log in and persist tokens plus operator identity in the session store
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = serde_json::json!({ "username": username, "password": password });
        let response: LoginResponse = self.gateway.post_json("auth/login", &body).await?;

        let store = self.gateway.store();
        store
            .set_tokens(&response.access_token, &response.refresh_token)
            .await?;
        store
            .set_identity(&response.username, &response.email, response.user_id)
            .await?;

        tracing::info!(username = %response.username, "operator logged in");
        Ok(response)
    }
}
