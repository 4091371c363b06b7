use serde::{Deserialize, Serialize};
use talent_core::api_paths;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::Tokens;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "bearer")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

fn bearer() -> String {
    "bearer".to_string()
}

impl ApiClient {
    /// Log in and keep the returned tokens in the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self
            .post(api_paths::LOGIN)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        self.session()
            .set_tokens(Tokens {
                access_token: response.access_token.clone(),
                refresh_token: response.refresh_token.clone(),
            })
            .await?;
        tracing::info!(username, "logged in");
        Ok(response)
    }

    /// Refresh the access token now rather than on the next 401.
    pub async fn refresh_session(&self) -> Result<(), ApiError> {
        self.refresh().await.map(|_| ())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().clear().await?;
        tracing::info!("logged out");
        Ok(())
    }
}
