//! Default OpenAI configs loaded from environment variables.
//!
//! Two roles are used by the chatbot:
//!
//! - **Chat** → short, low-temperature answers
//! - **Embedding** → vectors for the knowledge index and for queries
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY` = bearer token (optional at startup; calls fail without it)
//! - `OPENAI_URL` = API base (default `https://api.openai.com`)
//! - `OPENAI_MODEL` = chat model (default `gpt-4o-mini`)
//! - `OPENAI_EMBEDDING_MODEL` = embedding model (default `text-embedding-3-small`)
//! - `LLM_MAX_TOKENS` = completion budget (default `200`)
//! - `LLM_TEMPERATURE` = sampling temperature (default `0.3`)
//! - `LLM_TIMEOUT_SECS` = HTTP timeout (default `60`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, parse_opt_f32, parse_opt_u32, parse_opt_u64,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Chat profile from the process environment.
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    chat_config_from(env_lookup)
}

/// Embedding profile from the process environment.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    embedding_config_from(env_lookup)
}

/// Chat profile from an arbitrary key lookup.
///
/// # Defaults
/// - `max_tokens = Some(200)`
/// - `temperature = Some(0.3)`
/// - `timeout_secs = Some(60)`
pub fn chat_config_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = endpoint_from(&lookup)?;
    let model = non_empty(lookup("OPENAI_MODEL")).unwrap_or_else(|| DEFAULT_CHAT_MODEL.into());
    let max_tokens =
        parse_opt_u32("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"))?.unwrap_or(DEFAULT_MAX_TOKENS);
    let temperature = parse_opt_f32("LLM_TEMPERATURE", lookup("LLM_TEMPERATURE"))?
        .unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let timeout_secs = parse_opt_u64("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"))?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: non_empty(lookup("OPENAI_API_KEY")),
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Embedding profile from an arbitrary key lookup.
pub fn embedding_config_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = endpoint_from(&lookup)?;
    let model = non_empty(lookup("OPENAI_EMBEDDING_MODEL"))
        .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.into());
    let timeout_secs = parse_opt_u64("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"))?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: non_empty(lookup("OPENAI_API_KEY")),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

fn endpoint_from<F>(lookup: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = non_empty(lookup("OPENAI_URL")).unwrap_or_else(|| DEFAULT_OPENAI_URL.into());
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn chat_defaults_favor_short_deterministic_answers() {
        let cfg = chat_config_from(lookup(&[])).unwrap();
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.endpoint, "https://api.openai.com");
        assert_eq!(cfg.max_tokens, Some(200));
        assert_eq!(cfg.temperature, Some(0.3));
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn embedding_profile_reads_its_own_model() {
        let cfg = embedding_config_from(lookup(&[
            ("OPENAI_EMBEDDING_MODEL", "text-embedding-3-large"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();
        assert_eq!(cfg.model, "text-embedding-3-large");
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.max_tokens, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(chat_config_from(lookup(&[("LLM_TEMPERATURE", "9")])).is_err());
        assert!(chat_config_from(lookup(&[("LLM_MAX_TOKENS", "many")])).is_err());
        assert!(chat_config_from(lookup(&[("OPENAI_URL", "ftp://x")])).is_err());
    }
}
