//! Identity lookup against the Slack Web API `users.info` method.

use crate::domain::ports::IdentityLookup;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    error: Option<String>,
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    name: String,
}

pub struct SlackIdentityLookup {
    http: Client,
    token: SecretString,
    base_url: String,
}

impl SlackIdentityLookup {
    pub fn new(token: SecretString, timeout: Duration) -> Result<Self> {
        Self::with_base_url(token, timeout, SLACK_API_BASE)
    }

    pub fn with_base_url(
        token: SecretString,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::InternalError(Box::new(e)))?;

        Ok(Self {
            http,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdentityLookup for SlackIdentityLookup {
    async fn display_name(&self, user_id: &str) -> Result<String> {
        let url = format!("{}/users.info", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[("token", self.token.expose_secret()), ("user", user_id)])
            .send()
            .await
            .map_err(|e| LedgerError::lookup(user_id, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::lookup(user_id, format!("HTTP {}", status)));
        }

        let body: UsersInfoResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::lookup(user_id, e))?;

        match body {
            UsersInfoResponse {
                ok: true,
                user: Some(user),
                ..
            } => Ok(user.name),
            UsersInfoResponse { error, .. } => Err(LedgerError::lookup(
                user_id,
                error.unwrap_or_else(|| "missing user in response".to_string()),
            )),
        }
    }
}
