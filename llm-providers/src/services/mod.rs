//! Provider facade without async-trait or dynamic trait objects.
//!
//! A single enum [`ProviderClient`] wraps the concrete per-provider
//! clients. This keeps async fns simple and avoids boxing futures; the
//! orchestrating crate iterates an ordered list of these clients.

pub mod huggingface_service;
pub mod ollama_service;

use serde::{Deserialize, Serialize};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::LlmError;

/// Role of one prior conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Wire-format role string (`"user"` / `"assistant"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    /// Human-readable label used when flattening turns into a text prompt.
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        }
    }
}

/// One prior conversation turn passed to a provider as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Concrete provider client (enum-dispatch).
#[derive(Debug)]
pub enum ProviderClient {
    Ollama(ollama_service::OllamaService),
    HuggingFace(huggingface_service::HuggingFaceService),
}

impl ProviderClient {
    /// Constructs a concrete client from a lane config.
    ///
    /// # Errors
    /// Propagates the underlying client's validation errors (provider
    /// mismatch, bad endpoint, missing API key).
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Self::Ollama(ollama_service::OllamaService::new(cfg)?),
            LlmProvider::HuggingFace => {
                Self::HuggingFace(huggingface_service::HuggingFaceService::new(cfg)?)
            }
        })
    }

    /// Which provider this client talks to.
    pub fn kind(&self) -> LlmProvider {
        match self {
            Self::Ollama(_) => LlmProvider::Ollama,
            Self::HuggingFace(_) => LlmProvider::HuggingFace,
        }
    }

    /// Model identifier this client was configured with.
    pub fn model(&self) -> &str {
        match self {
            Self::Ollama(c) => c.model(),
            Self::HuggingFace(c) => c.model(),
        }
    }

    /// Sends one generation request: a system instruction, the recent
    /// conversation turns, and the current question.
    ///
    /// On success the provider's completion is returned already trimmed
    /// and guaranteed non-empty.
    ///
    /// # Errors
    /// Any transport error, non-success HTTP status, decode failure, or
    /// empty completion is a uniform [`LlmError`]; the caller treats all
    /// of them as "this lane failed".
    pub async fn send(
        &self,
        system: &str,
        turns: &[ChatTurn],
        question: &str,
    ) -> Result<String, LlmError> {
        match self {
            Self::Ollama(c) => c.chat(system, turns, question).await,
            Self::HuggingFace(c) => c.generate(system, turns, question).await,
        }
    }
}
