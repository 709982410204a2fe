use async_trait::async_trait;

use super::{PushError, PushGateway, PushMessage};
use crate::config::PushConfig;

/// Posts message batches to the Expo push API.
#[derive(Debug, Clone)]
pub struct ExpoPushClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl ExpoPushClient {
    pub fn new(endpoint: String, access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            access_token,
        }
    }

    pub fn from_config(config: &PushConfig) -> Self {
        Self::new(config.endpoint.clone(), config.access_token.clone())
    }
}

#[async_trait]
impl PushGateway for ExpoPushClient {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<(), PushError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| PushError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PushError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
