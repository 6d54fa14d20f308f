//! Unified error handling for `llm-providers`.
//!
//! One top-level [`LlmError`] for the whole crate, with domain-specific
//! errors grouped in nested enums ([`ConfigError`], [`ProviderError`]).
//! Small helpers for reading environment variables return the unified
//! [`Result<T>`] alias.
//!
//! All messages include the suffix `[LLM Providers]` to simplify
//! attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `llm-providers` crate.
///
/// Variants wrap domain-specific enums plus the common transport case.
/// Prefer adding new sub-enums for distinct domains instead of growing
/// this type indefinitely.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider call errors (bad endpoint, HTTP status, decode, empty text).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (includes request timeouts).
    #[error("[LLM Providers] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[LLM Providers] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, limits, timeouts).
    #[error("[LLM Providers] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g. `LLM_MAX_TOKENS`, `OLLAMA_PORT`).
        var: &'static str,
        /// Human-readable reason (e.g. `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g. invalid URL).
    #[error("[LLM Providers] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g. `OLLAMA_URL`).
        var: &'static str,
        /// Explanation (e.g. `must start with http:// or https://`).
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Error enum for provider calls, provider-agnostic.
///
/// Every variant counts as "this lane failed" to the cascade; none of
/// them should ever surface to an end user directly.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The config carries an unexpected provider for this client.
    #[error("[LLM Providers] invalid provider for this client")]
    InvalidProvider,

    /// The provider requires an API key and none was configured.
    #[error("[LLM Providers] missing API key")]
    MissingApiKey,

    /// The endpoint is empty or does not start with http/https.
    #[error("[LLM Providers] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("[LLM Providers] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[LLM Providers] failed to decode response: {0}")]
    Decode(String),

    /// The provider answered, but the completion was empty after trimming.
    #[error("[LLM Providers] provider returned an empty completion")]
    EmptyCompletion,
}

/* ------------------------------------------------------------------------- */
/* Helpers                                                                   */
/* ------------------------------------------------------------------------- */

/// Clamps a response body to a short, log-friendly snippet.
pub fn make_snippet(text: &str) -> String {
    text.chars().take(240).collect()
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u32>().map(Some).map_err(|_| {
            LlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            LlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start
/// with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_clamped() {
        let long = "x".repeat(1000);
        assert_eq!(make_snippet(&long).chars().count(), 240);
        assert_eq!(make_snippet("short"), "short");
    }

    #[test]
    fn endpoint_validation() {
        assert!(validate_http_endpoint("T", "http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("T", "https://api.example.com").is_ok());
        assert!(validate_http_endpoint("T", "localhost:11434").is_err());
        assert!(validate_http_endpoint("T", "").is_err());
    }
}
