//! Default lane configs resolved from environment variables.
//!
//! Two lanes exist:
//!
//! - **Ollama** (primary, local) — always configured; every variable has a
//!   default matching a stock local install.
//! - **Hugging Face** (secondary, remote) — enabled only when
//!   `HUGGINGFACE_API_KEY` is set to a non-empty value.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_MAX_TOKENS` = optional max generation length (u32, default 512)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)
//! - `OLLAMA_MODEL`                = chat model (default `mistral`)
//! - `OLLAMA_TIMEOUT_SECS`         = request timeout (default 60)
//!
//! Hugging Face-specific:
//! - `HUGGINGFACE_API_KEY`      = API token (presence enables the lane)
//! - `HUGGINGFACE_MODEL`        = model id (default `tiiuae/falcon-7b-instruct`)
//! - `HUGGINGFACE_URL`          = inference base URL (default hosted API)
//! - `HUGGINGFACE_TIMEOUT_SECS` = request timeout (default 30)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, LlmError, env_opt_u32, env_opt_u64},
};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "mistral";
const DEFAULT_HF_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_HF_MODEL: &str = "tiiuae/falcon-7b-instruct";
const DEFAULT_MAX_TOKENS: u32 = 512;

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. the stock local default
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is set but invalid
fn ollama_endpoint() -> Result<String, LlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

/// Constructs the config for the **primary** (local Ollama) lane.
///
/// # Defaults
/// - `temperature = Some(0.7)`, `top_p = Some(0.9)`
/// - `timeout_secs = Some(60)`
pub fn config_ollama_chat() -> Result<LlmModelConfig, LlmError> {
    let endpoint = ollama_endpoint()?;
    let model = env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL);
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.or(Some(DEFAULT_MAX_TOKENS));
    let timeout_secs = env_opt_u64("OLLAMA_TIMEOUT_SECS")?.or(Some(60));

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(0.7),
        top_p: Some(0.9),
        timeout_secs,
    })
}

/// Constructs the config for the **secondary** (remote Hugging Face) lane.
///
/// Returns `Ok(None)` when `HUGGINGFACE_API_KEY` is unset or empty, which
/// disables the lane entirely.
///
/// # Defaults
/// - `timeout_secs = Some(30)`
/// - sampling parameters are left to the hosted API
pub fn config_huggingface() -> Result<Option<LlmModelConfig>, LlmError> {
    let api_key = match std::env::var("HUGGINGFACE_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => return Ok(None),
    };

    let endpoint = env_or("HUGGINGFACE_URL", DEFAULT_HF_URL);
    let model = env_or("HUGGINGFACE_MODEL", DEFAULT_HF_MODEL);
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.or(Some(DEFAULT_MAX_TOKENS));
    let timeout_secs = env_opt_u64("HUGGINGFACE_TIMEOUT_SECS")?.or(Some(30));

    Ok(Some(LlmModelConfig {
        provider: LlmProvider::HuggingFace,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: None,
        top_p: None,
        timeout_secs,
    }))
}

fn env_or(name: &str, dflt: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}
