//! Lightweight Ollama chat client for answer generation.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/chat` — synchronous chat completion (`stream=false`)
//!
//! It uses the universal lane configuration [`LlmModelConfig`] and ensures
//! that the selected provider is [`LlmProvider::Ollama`].
//!
//! # Examples
//!
//! ```no_run
//! use llm_providers::{ChatTurn, LlmModelConfig, LlmProvider};
//! use llm_providers::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "mistral".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: Some(512),
//!     temperature: Some(0.7),
//!     top_p: Some(0.9),
//!     timeout_secs: Some(60),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let turns: Vec<ChatTurn> = Vec::new();
//! let text = svc
//!     .chat("You are a helpful assistant.", &turns, "How do I reset my password?")
//!     .await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{LlmError, ProviderError, make_snippet};
use crate::services::ChatTurn;

/// Thin client for the Ollama chat endpoint.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with
/// a configurable timeout.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`ProviderError::InvalidProvider`] if `cfg.provider` is not `Ollama`
    /// - [`ProviderError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(ProviderError::InvalidProvider.into());
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::InvalidEndpoint(cfg.endpoint).into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/api/chat", base);

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Model identifier this client was configured with.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** chat request via `/api/chat`.
    ///
    /// The message list is `[system, ...turns, user question]`. Mapped
    /// options:
    /// - `num_predict`  ← `self.cfg.max_tokens`
    /// - `temperature`  ← `self.cfg.temperature`
    /// - `top_p`        ← `self.cfg.top_p`
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`LlmError::HttpTransport`] for client errors (including timeouts)
    /// - [`ProviderError::Decode`] if the response cannot be parsed
    /// - [`ProviderError::EmptyCompletion`] if the answer trims to nothing
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn chat(
        &self,
        system: &str,
        turns: &[ChatTurn],
        question: &str,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(turns.len() + 2);
        messages.push(WireMessage {
            role: "system",
            content: system,
        });
        for turn in turns {
            messages.push(WireMessage {
                role: turn.role.as_str(),
                content: &turn.content,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: question,
        });

        let body = ChatRequest {
            model: &self.cfg.model,
            messages,
            stream: false,
            options: Some(ChatOptions {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                num_predict: self.cfg.max_tokens,
            }),
        };

        debug!("POST {}", self.url_chat);
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            }
            .into());
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            ProviderError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
        })?;

        let text = out
            .message
            .map(|m| m.content)
            .unwrap_or_default()
            .trim()
            .to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion.into());
        }
        Ok(text)
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/chat` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

/// One role/content pair on the wire.
#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Subset of Ollama `options`.
///
/// Extend this struct as needed (top_k, stop sequences, penalties, etc.).
#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Response body for `/api/chat`.
///
/// Minimal shape: the generated text is in `message.content`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ChatRole;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "mistral".into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: Some(512),
            temperature: Some(0.7),
            top_p: Some(0.9),
            timeout_secs: Some(60),
        }
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(matches!(
            OllamaService::new(cfg("localhost:11434")),
            Err(LlmError::Provider(ProviderError::InvalidEndpoint(_)))
        ));
        assert!(OllamaService::new(cfg("")).is_err());
    }

    #[test]
    fn rejects_wrong_provider() {
        let mut c = cfg("http://localhost:11434");
        c.provider = LlmProvider::HuggingFace;
        assert!(matches!(
            OllamaService::new(c),
            Err(LlmError::Provider(ProviderError::InvalidProvider))
        ));
    }

    #[test]
    fn chat_request_serializes_in_message_order() {
        let turns = vec![
            ChatTurn {
                role: ChatRole::User,
                content: "my printer is offline".into(),
            },
            ChatTurn {
                role: ChatRole::Assistant,
                content: "try power cycling it".into(),
            },
        ];

        let mut messages = vec![WireMessage {
            role: "system",
            content: "be concise",
        }];
        for t in &turns {
            messages.push(WireMessage {
                role: t.role.as_str(),
                content: &t.content,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: "still offline",
        });

        let body = ChatRequest {
            model: "mistral",
            messages,
            stream: false,
            options: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        let roles: Vec<_> = json["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert!(json.get("options").is_none());
    }
}
