use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::core::config::Settings;
use crate::core::metrics::{COMPLETION_DURATION_SECONDS, COMPLETION_REQUESTS_TOTAL};
use crate::services::prompts::SYSTEM_PROMPT;

/// Failure of the single outbound completion call. Never retried here.
#[derive(Debug, Error)]
pub(crate) enum CompletionError {
    #[error("failed to reach text completion service: {0}")]
    Transport(String),
    #[error("text completion service returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("malformed text completion response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub(crate) trait TextCompletion: Send + Sync {
    /// Sends `prompt` as the user message and returns the trimmed completion text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub(crate) struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompletionClient {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let ai = settings.ai();
        Self::new(&ai.openai_base_url, &ai.openai_api_key, &ai.ai_model, ai.ai_request_timeout)
    }

    pub(crate) fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_seconds: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    async fn request(&self, prompt: &str) -> Result<String, CompletionError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ]
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| CompletionError::Transport(err.to_string()))?;
        tracing::debug!(status = status.as_u16(), body = %body, "Text completion raw response");

        if !status.is_success() {
            let message = serde_json::from_str::<UpstreamErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Upstream { status: status.as_u16(), message });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|err| CompletionError::MalformedResponse(err.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| CompletionError::MalformedResponse("missing message content".to_string()))
    }
}

#[async_trait]
impl TextCompletion for OpenAiCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let timer = Instant::now();
        tracing::info!(model = %self.model, prompt_chars = prompt.len(), "Sending text completion request");

        let result = self.request(prompt).await;
        let elapsed = timer.elapsed().as_secs_f64();
        metrics::histogram!(COMPLETION_DURATION_SECONDS).record(elapsed);

        match &result {
            Ok(content) => {
                metrics::counter!(COMPLETION_REQUESTS_TOTAL, "status" => "success").increment(1);
                tracing::info!(
                    duration_seconds = elapsed,
                    completion_chars = content.len(),
                    "Text completion received"
                );
            }
            Err(err) => {
                metrics::counter!(COMPLETION_REQUESTS_TOTAL, "status" => "failed").increment(1);
                tracing::error!(error = %err, duration_seconds = elapsed, "Text completion failed");
            }
        }

        result
    }
}


#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    use super::*;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        format!("http://{addr}/v1")
    }

    #[tokio::test]
    async fn complete_sends_system_and_user_messages_and_trims_content() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][0]["content"], "You are a helpful assistant.");
                assert_eq!(body["messages"][1]["role"], "user");
                assert_eq!(body["messages"][1]["content"], "hello");
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "  hi there \n"}}]
                }))
            }),
        );
        let base_url = spawn_upstream(router).await;

        let client = OpenAiCompletionClient::new(&base_url, "key", "test-model", 5).unwrap();
        let content = client.complete("hello").await.expect("completion");

        assert_eq!(content, "hi there");
    }

    #[tokio::test]
    async fn complete_surfaces_upstream_error_message() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "You exceeded your current quota"}})),
                )
            }),
        );
        let base_url = spawn_upstream(router).await;

        let client = OpenAiCompletionClient::new(&base_url, "key", "test-model", 5).unwrap();
        let err = client.complete("hello").await.unwrap_err();

        match err {
            CompletionError::Upstream { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "You exceeded your current quota");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_rejects_response_without_choices() {
        let router = Router::new()
            .route("/v1/chat/completions", post(|| async { Json(json!({"choices": []})) }));
        let base_url = spawn_upstream(router).await;

        let client = OpenAiCompletionClient::new(&base_url, "key", "test-model", 5).unwrap();
        let err = client.complete("hello").await.unwrap_err();

        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn complete_reports_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client =
            OpenAiCompletionClient::new(&format!("http://{addr}/v1"), "key", "test-model", 5)
                .unwrap();
        let err = client.complete("hello").await.unwrap_err();

        assert!(matches!(err, CompletionError::Transport(_)));
    }
}
