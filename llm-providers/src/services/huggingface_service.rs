//! Hugging Face inference API client for answer generation.
//!
//! Minimal, non-streaming client around the hosted text-generation
//! endpoint. The request URL is derived from `LlmModelConfig`:
//! - `POST {endpoint}/{model}` — text generation
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::HuggingFace`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Unlike Ollama's chat API, the hosted endpoint takes a single flat
//! prompt string, so the system instruction and the recent turns are
//! flattened into labelled lines before sending.
//!
//! Errors are normalized via the unified types in `error_handler`.

use std::time::Duration;

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{LlmError, ProviderError, make_snippet};
use crate::services::ChatTurn;

/// Thin client for the Hugging Face inference API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` with timeout and default auth headers.
#[derive(Debug)]
pub struct HuggingFaceService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
}

impl HuggingFaceService {
    /// Creates a new [`HuggingFaceService`] from the given config.
    ///
    /// # Errors
    /// - [`ProviderError::InvalidProvider`] if `cfg.provider` is not `HuggingFace`
    /// - [`ProviderError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`ProviderError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        if cfg.provider != LlmProvider::HuggingFace {
            return Err(ProviderError::InvalidProvider.into());
        }

        let api_key = cfg
            .api_key
            .clone()
            .ok_or(ProviderError::MissingApiKey)?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ProviderError::Decode(format!("invalid API key header: {e}"))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{}/{}", base, cfg.model);

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            timeout_secs = cfg.timeout_secs.unwrap_or(30),
            "HuggingFaceService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    /// Model identifier this client was configured with.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a single, non-streaming generation request.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`LlmError::HttpTransport`] for client errors (including timeouts)
    /// - [`ProviderError::Decode`] if the response cannot be parsed
    /// - [`ProviderError::EmptyCompletion`] if the answer trims to nothing
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(
        &self,
        system: &str,
        turns: &[ChatTurn],
        question: &str,
    ) -> Result<String, LlmError> {
        let prompt = flatten_prompt(system, turns, question);
        let body = GenerateRequest {
            inputs: &prompt,
            parameters: GenerateParameters {
                max_length: self.cfg.max_tokens,
            },
        };

        debug!("POST {}", self.url_generate);
        let resp = self.client.post(&self.url_generate).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            }
            .into());
        }

        let out: Vec<Generated> = resp.json().await.map_err(|e| {
            ProviderError::Decode(format!(
                "serde error: {e}; expected `[{{ generated_text: string }}]`"
            ))
        })?;

        let text = out
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Decode("empty candidate list".to_string()))?
            .generated_text
            .trim()
            .to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion.into());
        }
        Ok(text)
    }
}

/// Flattens the uniform `(system, turns, question)` call shape into the
/// single prompt string the hosted endpoint expects.
fn flatten_prompt(system: &str, turns: &[ChatTurn], question: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(system);
    prompt.push_str("\n\n");
    for turn in turns {
        prompt.push_str(turn.role.label());
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }
    prompt.push_str("\nUser: ");
    prompt.push_str(question);
    prompt.push_str("\nAssistant:");
    prompt
}

/* ==========================
HTTP payloads
========================== */

/// Request body for the hosted text-generation endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u32>,
}

/// One generation candidate in the response array.
#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}
