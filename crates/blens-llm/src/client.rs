//! Chat-completions client: the single LLM boundary.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::LlmError;

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Built once at startup and shared by reference; stateless per call.
/// The base URL is configurable so tests can point it at a local mock.
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    /// Creates an `LlmClient` for `{api_base}/chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_base: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Sends one prompt (plus optional base64 PNG attachments) and returns
    /// the model's free-form reply text.
    ///
    /// Images are attached as `image_url` content parts carrying
    /// `data:image/png;base64,` URLs.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] — transport failure.
    /// - [`LlmError::UnexpectedStatus`] — non-2xx from the service.
    /// - [`LlmError::MissingContent`] — reply without
    ///   `choices[0].message.content`.
    pub async fn send_prompt(&self, prompt: &str, images: &[&str]) -> Result<String, LlmError> {
        let content = if images.is_empty() {
            json!(prompt)
        } else {
            let mut parts = vec![json!({ "type": "text", "text": prompt })];
            for image in images {
                parts.push(json!({
                    "type": "image_url",
                    "image_url": { "url": format!("data:image/png;base64,{image}") }
                }));
            }
            json!(parts)
        };

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": content }],
            "temperature": 0.2
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let reply: Value = response.json().await?;
        reply
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(LlmError::MissingContent)
    }
}
