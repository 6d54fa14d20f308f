//! LLM provider clients for the help-desk answer pipeline.
//!
//! The crate exposes one concrete client per generation lane:
//! - [`services::ollama_service::OllamaService`] — local Ollama chat API
//! - [`services::huggingface_service::HuggingFaceService`] — remote Hugging
//!   Face inference API
//!
//! plus the enum-dispatch facade [`services::ProviderClient`], unified error
//! types in [`error_handler`], environment-driven default configs in
//! [`config::default_config`], and best-effort provider health probes in
//! [`health_service`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::LlmError;
pub use services::{ChatRole, ChatTurn, ProviderClient};
