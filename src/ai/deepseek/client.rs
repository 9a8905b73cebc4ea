use crate::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

pub struct DeepSeekHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Option<Duration>,
}

impl DeepSeekHttpClient {
    pub fn new_with_client(
        api_key: String,
        base_url: String,
        timeout: Option<Duration>,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            timeout,
        }
    }

    /// POST a JSON body and return the raw response text of a 2xx reply.
    pub async fn post_text<Req: Serialize>(&self, path: &str, request: &Req) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to DeepSeek: {}", e);
            e
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("DeepSeek API error (status {}): {}", status, body);
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    pub async fn chat_completion<Req: Serialize>(&self, request: &Req) -> Result<String> {
        self.post_text(CHAT_COMPLETIONS_PATH, request).await
    }
}
