//! Ollama-protocol generation backend.
//!
//! Talks to `POST {host}/api/generate` with a single non-streaming request
//! and probes `GET {host}/api/tags` for health. Any server that speaks this
//! protocol works (Ollama itself, llama.cpp's Ollama shim, test stubs).
//!
//! Every failure is classified and folded into a [`GenerationResult`];
//! nothing raised by reqwest or serde reaches the caller.

use crate::classify::{classify_status, classify_transport};
use async_trait::async_trait;
use lifexia_config::GenerationConfig;
use lifexia_core::error::GenerationError;
use lifexia_core::generation::{GenerationRequest, GenerationResult, Generator};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Connection and sampling settings for [`OllamaGenerator`].
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub host: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout: Duration,
    pub health_timeout: Duration,
}

impl OllamaSettings {
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            model: model.into(),
            temperature: 0.7,
            top_p: 0.9,
            timeout: Duration::from_secs(60),
            health_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&GenerationConfig> for OllamaSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            host: config.host.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            timeout: Duration::from_secs(config.timeout_secs),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        }
    }
}

/// A generator backed by an Ollama-compatible HTTP server.
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    health_timeout: Duration,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsReply {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

impl OllamaGenerator {
    /// Create a new generator. The request timeout is enforced by the
    /// HTTP client, so an overrun surfaces as a reqwest timeout.
    pub fn new(settings: OllamaSettings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GenerationError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: settings.host.trim_end_matches('/').to_string(),
            model: settings.model,
            temperature: settings.temperature,
            top_p: settings.top_p,
            health_timeout: settings.health_timeout,
            client,
        })
    }

    /// Create a generator from the `[generation]` config section.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        Self::new(OllamaSettings::from(config))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Compose the single prompt string the generate endpoint expects.
    /// Empty sections are left out.
    fn compose_prompt(request: &GenerationRequest) -> String {
        let mut prompt = String::new();
        if !request.system_prompt.trim().is_empty() {
            prompt.push_str(request.system_prompt.trim());
            prompt.push_str("\n\n");
        }
        if !request.context.trim().is_empty() {
            prompt.push_str("Context:\n");
            prompt.push_str(request.context.trim());
            prompt.push_str("\n\n");
        }
        prompt.push_str("User Query: ");
        prompt.push_str(request.prompt.trim());
        prompt.push_str("\n\nAssistant:");
        prompt
    }

    async fn try_generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateBody {
            model: &self.model,
            prompt: Self::compose_prompt(request),
            stream: false,
            options: SamplingOptions {
                temperature: self.temperature,
                top_p: self.top_p,
            },
        };

        debug!(model = %self.model, url = %url, "Sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::new(classify_transport(&e), e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::new(classify_transport(&e), e.to_string()))?;

        if status != 200 {
            warn!(status, body = %text, "Generation backend returned error");
            return Err(GenerationError::new(
                classify_status(status, &text),
                format!("status {status}"),
            ));
        }

        let reply: GenerateReply = serde_json::from_str(&text)
            .map_err(|e| GenerationError::unknown(format!("Failed to parse response: {e}")))?;

        Ok(reply.response)
    }

    async fn fetch_tags(&self) -> Option<TagsReply> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }
        // A reachable server with an odd body still counts as up.
        Some(response.json().await.unwrap_or(TagsReply { models: Vec::new() }))
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        let started = Instant::now();
        let outcome = self.try_generate(&request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if let Err(e) = &outcome {
            warn!(error_kind = %e.kind, error = %e.message, elapsed_ms, "Generation failed");
        } else {
            debug!(elapsed_ms, "Generation succeeded");
        }

        GenerationResult::from_outcome(outcome)
    }

    async fn check_health(&self) -> bool {
        self.fetch_tags().await.is_some()
    }

    async fn list_models(&self) -> Vec<String> {
        self.fetch_tags()
            .await
            .map(|tags| tags.models.into_iter().map(|m| m.name).collect())
            .unwrap_or_default()
    }
}
