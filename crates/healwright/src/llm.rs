//! Language-model collaborator.
//!
//! The healing path treats the model as an opaque text-in/text-out service:
//! [`LlmClient::complete`] either returns response text or fails after the
//! client's own retry budget is exhausted. [`OpenAiClient`] talks to any
//! OpenAI-compatible chat-completions endpoint.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SelfHealingSettings;
use crate::error::{Error, Result};

/// Opaque completion service consumed by the self-healing resolver.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` and returns the model's text response.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// Applies a fixed-delay retry budget internally (3 attempts, 2 s apart by
/// default); callers see a single `complete` that either succeeds or has
/// already exhausted its budget.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    /// Builds a client from the self-healing config section and a resolved
    /// API key (see [`FrameworkConfig::resolved_api_key`](crate::config::FrameworkConfig::resolved_api_key)).
    pub fn from_config(settings: &SelfHealingSettings, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: settings.model.clone(),
            max_attempts: settings.max_attempts,
            retry_delay: settings.retry_delay(),
        })
    }

    async fn request_once(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a helpful assistant.",
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::Llm("response contained no completion".to_string()))?;

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        retry_fixed(self.max_attempts, self.retry_delay, || {
            self.request_once(prompt)
        })
        .await
    }
}

/// Runs `op` up to `max_attempts` times with a fixed delay between attempts.
/// No exponential backoff, no jitter.
pub(crate) async fn retry_fixed<T, F, Fut>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %e, "attempt failed; retrying after delay");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!("all {max_attempts} attempts failed")));
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retry_returns_first_success() {
        let mut calls = 0u32;
        let result = retry_fixed(3, Duration::from_millis(1), || {
            calls += 1;
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.expect("should succeed"), 7);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn retry_recovers_within_budget() {
        let mut calls = 0u32;
        let result = retry_fixed(3, Duration::from_millis(1), || {
            calls += 1;
            let ready = calls >= 3;
            async move {
                if ready {
                    Ok("healed")
                } else {
                    Err(Error::Llm("not yet".to_string()))
                }
            }
        })
        .await;
        assert_eq!(result.expect("third attempt succeeds"), "healed");
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn retry_stops_after_exactly_max_attempts() {
        let mut calls = 0u32;
        let result: Result<()> = retry_fixed(3, Duration::from_millis(1), || {
            calls += 1;
            async { Err(Error::Llm("down".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn chat_response_parses_openai_shape() {
        let raw = r##"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "locator = \"#user\""}}
            ]
        }"##;
        let parsed: ChatResponse = serde_json::from_str(raw).expect("valid payload");
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("locator = \"#user\"")
        );
    }
}
