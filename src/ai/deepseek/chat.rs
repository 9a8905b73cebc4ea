//! DeepSeek implementation of [`CoupletService`].
//!
//! The reply is JSON inside JSON: the transport envelope carries the model's
//! message as a string, and that string must itself decode to a couplet.
//! Each layer fails with its own error variant.

use super::client::DeepSeekHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ResponseFormat};
use crate::ai::CoupletService;
use crate::config::{Config, API_KEY_VAR};
use crate::models::{coerce_text, Couplet, PromptPair};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

pub const TEMPERATURE: f32 = 0.9;

pub struct DeepSeekCoupletClient {
    http: Option<DeepSeekHttpClient>,
    model: String,
}

impl DeepSeekCoupletClient {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self::new_with_client(api_key, base_url, model, None, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout: Option<std::time::Duration>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: api_key
                .map(|key| DeepSeekHttpClient::new_with_client(key, base_url, timeout, client)),
            model,
        }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new_with_client(
            config.deepseek_api_key.clone(),
            config.deepseek_base_url.clone(),
            config.deepseek_model.clone(),
            config.upstream_timeout,
            client,
        )
    }
}

#[async_trait]
impl CoupletService for DeepSeekCoupletClient {
    async fn generate_couplet(&self, prompts: &PromptPair) -> Result<Couplet> {
        let http = self
            .http
            .as_ref()
            .ok_or_else(|| Error::Configuration(format!("Missing {}", API_KEY_VAR)))?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts.system.as_str()),
                ChatMessage::user(prompts.user.as_str()),
            ],
            temperature: TEMPERATURE,
            response_format: Some(ResponseFormat::json_object()),
        };

        tracing::debug!(
            "Requesting couplet from DeepSeek (model: {}, user prompt: {} chars)",
            self.model,
            prompts.user.chars().count()
        );

        let body = http.chat_completion(&request).await?;
        let couplet = parse_completion(&body).inspect_err(|e| {
            tracing::error!("Rejected DeepSeek reply: {}", e);
        })?;

        tracing::info!("Generated couplet with caption {}", couplet.horizontal);
        Ok(couplet)
    }
}

/// Decode a raw completion body into a couplet.
pub fn parse_completion(body: &str) -> Result<Couplet> {
    let envelope: Value = serde_json::from_str(body).map_err(|source| Error::EnvelopeNotJson {
        body: body.to_string(),
        source,
    })?;

    let raw_content = envelope.pointer("/choices/0/message/content");

    // Structured content has no text form that could hold the couplet JSON.
    if let Some(structured @ (Value::Object(_) | Value::Array(_))) = raw_content {
        return Err(Error::PayloadNotJson {
            content: structured.to_string(),
            source: serde::de::Error::custom("message content is not a string"),
        });
    }

    let content = raw_content
        .and_then(coerce_text)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| Error::MissingContent {
            body: body.to_string(),
        })?;

    let payload: Value =
        serde_json::from_str(&content).map_err(|source| Error::PayloadNotJson {
            content: content.clone(),
            source,
        })?;

    Couplet::from_payload(&payload).ok_or(Error::InvalidCouplet { content })
}
