//! OpenAI service for chat completions and embeddings.
//!
//! Minimal, non-streaming client around the OpenAI REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions — chat completion over a message list
//! - POST {endpoint}/v1/embeddings       — embeddings (single input or batch)
//!
//! Constructor validation:
//! - `cfg.model` must not be empty
//! - `cfg.endpoint` must start with http:// or https://
//!
//! A missing API key is **not** a constructor error: the service starts and
//! every call returns [`ProviderError::MissingApiKey`] until a key is configured.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, make_snippet, validate_http_endpoint,
    },
    messages::ChatMessage,
};

/// Thin client for the OpenAI API.
///
/// High-level operations:
/// - [`OpenAiService::chat`]             — single, non-streaming chat completion
/// - [`OpenAiService::embeddings`]       — one embeddings vector
/// - [`OpenAiService::embeddings_batch`] — vectors for many inputs in one request
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] if `cfg.model` is blank
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is not an http(s) URL
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let endpoint = cfg.endpoint.trim();
        validate_http_endpoint("OPENAI_URL", endpoint)?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/v1/chat/completions", base);
        let url_embeddings = format!("{}/v1/embeddings", base);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            has_api_key = cfg.api_key.is_some(),
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// The config this client was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Performs a **non-streaming** chat completion request (`/v1/chat/completions`).
    ///
    /// Mapped options from config: `model`, `temperature`, `top_p`, `max_tokens`.
    ///
    /// # Errors
    /// - [`ProviderError::MissingApiKey`] when no key is configured
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`ProviderError::Decode`] if the JSON cannot be parsed
    /// - [`ProviderError::EmptyChoices`] if no choices are returned
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let key = self.api_key()?;
        let body = ChatCompletionRequest::from_cfg(&self.cfg, messages);

        debug!(
            model = %self.cfg.model,
            messages = messages.len(),
            prompt_chars = messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_chat, started).await);
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode /v1/chat/completions response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                ))
                .into());
            }
        };

        let content = first_content(out).ok_or(ProviderError::EmptyChoices)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            answer_chars = content.chars().count(),
            "chat completion completed"
        );

        Ok(content)
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let mut vectors = self.embed_request(EmbeddingsInput::One(input)).await?;
        vectors.pop().ok_or_else(|| {
            ProviderError::Decode("empty `data` in embeddings response".into()).into()
        })
    }

    /// Retrieves vectors for all `inputs` in one request, in input order.
    pub async fn embeddings_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.embed_request(EmbeddingsInput::Many(inputs)).await?;
        if vectors.len() != inputs.len() {
            return Err(ProviderError::Decode(format!(
                "embeddings count {} != inputs {}",
                vectors.len(),
                inputs.len()
            ))
            .into());
        }
        Ok(vectors)
    }

    /* --------------------- Internals --------------------- */

    async fn embed_request(&self, input: EmbeddingsInput<'_>) -> Result<Vec<Vec<f32>>, AiLlmError> {
        let started = Instant::now();
        let key = self.api_key()?;
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(model = %self.cfg.model, inputs = body.input.len(), "POST {}", self.url_embeddings);

        let resp = self
            .client
            .post(&self.url_embeddings)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_embeddings, started).await);
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode /v1/embeddings response"
            );
            ProviderError::Decode(format!("serde error: {e}; expected `data[].embedding`"))
        })?;

        debug!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "embeddings completed"
        );

        Ok(ordered_embeddings(out))
    }

    fn api_key(&self) -> Result<&str, AiLlmError> {
        self.cfg
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey.into())
    }

    async fn status_error(
        &self,
        resp: reqwest::Response,
        url: &str,
        started: Instant,
    ) -> AiLlmError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);

        error!(
            %status,
            %url,
            %snippet,
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "OpenAI returned non-success status"
        );

        ProviderError::HttpStatus(HttpError {
            status,
            url: url.to_string(),
            snippet,
        })
        .into()
    }
}

/// Pick the first choice that carries text content.
fn first_content(resp: ChatCompletionResponse) -> Option<String> {
    resp.choices.into_iter().find_map(|c| c.message.content)
}

/// Sort embedding items by their `index` and strip them to plain vectors.
fn ordered_embeddings(resp: EmbeddingsResponse) -> Vec<Vec<f32>> {
    let mut items = resp.data;
    items.sort_by_key(|i| i.index);
    items.into_iter().map(|i| i.embedding).collect()
}

/* ===========================================================================
HTTP payloads & options
======================================================================== */

/// Request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, messages: &'a [ChatMessage]) -> Self {
        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

/// `input` accepts a string or an array of strings.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbeddingsInput<'a> {
    One(&'a str),
    Many(&'a [String]),
}

impl EmbeddingsInput<'_> {
    fn len(&self) -> usize {
        match self {
            EmbeddingsInput::One(_) => 1,
            EmbeddingsInput::Many(v) => v.len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: EmbeddingsInput<'a>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg(api_key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com/".into(),
            api_key: api_key.map(str::to_string),
            max_tokens: Some(200),
            temperature: Some(0.5),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn chat_request_carries_budget_and_messages() {
        let c = cfg(None);
        let messages = vec![ChatMessage::system("rules"), ChatMessage::user("okna?")];
        let body = serde_json::to_value(ChatCompletionRequest::from_cfg(&c, &messages)).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "rules"},
                    {"role": "user", "content": "okna?"}
                ],
                "temperature": 0.5,
                "max_tokens": 200
            })
        );
    }

    #[test]
    fn batch_embeddings_are_reordered_by_index() {
        let resp: EmbeddingsResponse = serde_json::from_value(json!({
            "data": [
                {"index": 1, "embedding": [2.0]},
                {"index": 0, "embedding": [1.0]}
            ]
        }))
        .unwrap();
        assert_eq!(ordered_embeddings(resp), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn first_choice_with_content_wins() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"content": null}},
                {"message": {"content": "Dzień dobry"}}
            ]
        }))
        .unwrap();
        assert_eq!(first_content(resp).as_deref(), Some("Dzień dobry"));
    }

    #[test]
    fn urls_are_derived_from_endpoint() {
        let svc = OpenAiService::new(cfg(Some("sk"))).unwrap();
        assert_eq!(svc.url_chat, "https://api.openai.com/v1/chat/completions");
        assert_eq!(svc.url_embeddings, "https://api.openai.com/v1/embeddings");
    }

    #[tokio::test]
    async fn missing_key_fails_at_call_time() {
        let svc = OpenAiService::new(cfg(None)).unwrap();
        let err = svc.chat(&[ChatMessage::user("hej")]).await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError::MissingApiKey)
        ));
    }
}
