//! Text-generation backends.
//!
//! The composer only ever sees [`TextGenerator`]: one prompt in, the model's
//! continuation out. [`GeneratorBackend`] instantiates a generator for a
//! model id. The shipped backend talks to a locally running Ollama runtime.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::model::SamplingParams;
use crate::{NewsletterError, Result};

/// Default address of the local Ollama runtime.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// A loaded model that continues prompts.
///
/// Implementations must not share mutable generation state between calls,
/// so one generator may serve concurrent requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate at most `max_new_tokens` tokens continuing `prompt`.
    ///
    /// Returns only the new text, not the prompt. Generation stops at the
    /// model's end-of-sequence marker.
    async fn generate(&self, prompt: &str, max_new_tokens: usize, params: &SamplingParams) -> Result<String>;
}

/// Instantiates generators by model id.
pub trait GeneratorBackend: Send + Sync {
    fn load(&self, model_id: &str) -> Result<Box<dyn TextGenerator>>;
}

/// Connection settings for the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base URL of the Ollama runtime.
    pub endpoint: String,
    /// Context window in tokens; longer prompts are truncated by the runtime.
    pub context_window: u32,
    /// Per-call timeout in seconds. `None` waits indefinitely.
    pub timeout: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_OLLAMA_URL.to_string(), context_window: 2048, timeout: None }
    }
}

/// Backend that serves every model from one Ollama runtime.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    config: GeneratorConfig,
    client: Client,
}

impl OllamaBackend {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }
}

impl GeneratorBackend for OllamaBackend {
    fn load(&self, model_id: &str) -> Result<Box<dyn TextGenerator>> {
        if model_id.trim().is_empty() {
            return Err(NewsletterError::Generation("model id is empty".to_string()));
        }

        Ok(Box::new(OllamaGenerator {
            base_url: self.config.endpoint.trim_end_matches('/').to_string(),
            model: model_id.to_string(),
            context_window: self.config.context_window,
            client: self.client.clone(),
        }))
    }
}

/// One model on an Ollama runtime.
///
/// Prompts are sent raw so the caller's own template reaches the model.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    context_window: u32,
    client: Client,
}

impl OllamaGenerator {
    fn request_body(&self, prompt: &str, max_new_tokens: usize, params: &SamplingParams) -> serde_json::Value {
        let temperature = if params.do_sample { params.temperature } else { 0.0 };
        json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "raw": true,
            "options": {
                "num_predict": max_new_tokens,
                "num_ctx": self.context_window,
                "temperature": temperature,
                "top_p": params.top_p,
                "top_k": params.top_k,
                "repeat_penalty": params.repetition_penalty,
            }
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, max_new_tokens: usize, params: &SamplingParams) -> Result<String> {
        debug!(model = %self.model, max_new_tokens, prompt_chars = prompt.chars().count(), "generating");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&self.request_body(prompt, max_new_tokens, params))
            .send()
            .await
            .map_err(|e| {
                NewsletterError::Generation(format!("cannot reach model runtime at {}: {}", self.base_url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsletterError::Generation(format!(
                "model '{}' returned {}: {}",
                self.model, status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NewsletterError::Generation(format!("invalid runtime response: {}", e)))?;

        result["response"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| NewsletterError::Generation("runtime response has no text".to_string()))
    }
}
