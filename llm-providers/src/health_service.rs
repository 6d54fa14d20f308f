//! Best-effort health probes for the configured provider lanes.
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//! - Hugging Face: authorized `GET {endpoint}/{model}`
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a
//! `/health` endpoint. [`HealthService::check`] is resilient and never
//! fails (errors are mapped to `ok=false`).

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{LlmError, make_snippet};

/// A serializable health snapshot for a single lane config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g. "Ollama", "HuggingFace").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(
        provider: LlmProvider,
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: format!("{provider:?}"),
            endpoint: endpoint.to_string(),
            model: model.map(str::to_string),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    #[inline]
    fn fail(
        provider: LlmProvider,
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: format!("{provider:?}"),
            endpoint: endpoint.to_string(),
            model: model.map(str::to_string),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// A universal health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`LlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Checks health for a single lane config, routing to the
    /// provider-specific probe.
    ///
    /// This method is **resilient**: it never returns an error. Any failure
    /// is converted to `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(provider = ?cfg.provider, endpoint = %cfg.endpoint, "invalid endpoint for health probe");
            return HealthStatus::fail(
                cfg.provider,
                &cfg.endpoint,
                Some(&cfg.model),
                0,
                "invalid endpoint (empty or missing http/https)",
            );
        }

        match cfg.provider {
            LlmProvider::Ollama => self.probe_ollama(cfg).await,
            LlmProvider::HuggingFace => self.probe_huggingface(cfg).await,
        }
    }

    /// Checks a list of lane configs sequentially.
    pub async fn check_many(&self, cfgs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(cfgs.len());
        for cfg in cfgs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /* --------------------- Probes --------------------- */

    async fn probe_ollama(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let base = cfg.endpoint.trim_end_matches('/');
        let url = format!("{}/api/tags", base);
        let started = Instant::now();

        let resp = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                return HealthStatus::fail(
                    cfg.provider,
                    &cfg.endpoint,
                    Some(&cfg.model),
                    started.elapsed().as_millis(),
                    format!("transport error: {e}"),
                );
            }
        };
        let latency = started.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return HealthStatus::fail(
                cfg.provider,
                &cfg.endpoint,
                Some(&cfg.model),
                latency,
                format!("HTTP {status}: {}", make_snippet(&body)),
            );
        }

        // Best-effort model existence check on top of reachability.
        match resp.json::<TagsResponse>().await {
            Ok(tags) => {
                let present = tags
                    .models
                    .iter()
                    .any(|m| m.name == cfg.model || m.name.starts_with(&format!("{}:", cfg.model)));
                if present {
                    HealthStatus::ok(
                        cfg.provider,
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        "reachable, model present",
                    )
                } else {
                    HealthStatus::ok(
                        cfg.provider,
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        "reachable, model not in local tags",
                    )
                }
            }
            Err(e) => HealthStatus::fail(
                cfg.provider,
                &cfg.endpoint,
                Some(&cfg.model),
                latency,
                format!("decode error: {e}"),
            ),
        }
    }

    async fn probe_huggingface(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let base = cfg.endpoint.trim_end_matches('/');
        let url = format!("{}/{}", base, cfg.model);
        let started = Instant::now();

        let mut req = self.client.get(&url);
        if let Some(key) = &cfg.api_key {
            req = req.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        match req.send().await {
            Ok(resp) => {
                let latency = started.elapsed().as_millis();
                if resp.status().is_success() {
                    HealthStatus::ok(
                        cfg.provider,
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        "reachable",
                    )
                } else {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    HealthStatus::fail(
                        cfg.provider,
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        format!("HTTP {status}: {}", make_snippet(&body)),
                    )
                }
            }
            Err(e) => HealthStatus::fail(
                cfg.provider,
                &cfg.endpoint,
                Some(&cfg.model),
                started.elapsed().as_millis(),
                format!("transport error: {e}"),
            ),
        }
    }
}

/// Response body for `/api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}
