//! Model-driven newsletter composition.
//!
//! A composition is four dependent generation calls (headline, introduction,
//! sections, call to action) followed by validation. What happens when the
//! model falls short depends on [`CompositionMode`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fallback::compose_fallback;
use crate::generator::{GeneratorBackend, TextGenerator};
use crate::model::{DEFAULT_MODEL, SamplingParams, prompt_style};
use crate::newsletter::{Audience, MAX_SECTIONS, Newsletter};
use crate::progress::{ComposeProgress, ComposeStage, NoProgress};
use crate::prompts;
use crate::{NewsletterError, Result};

/// Minimum trimmed content length, in characters, before any model call.
pub const MIN_CONTENT_CHARS: usize = 50;

/// Number of chunks the content is split into for section prompts.
pub const SECTION_CHUNKS: usize = 3;

/// How composition failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionMode {
    /// Validation and model failures propagate to the caller.
    #[default]
    Strict,
    /// Validation and model failures are replaced by the rule-based newsletter.
    Lenient,
}

/// Composer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub mode: CompositionMode,
    pub min_content_chars: usize,
    /// Model used when a request does not name one.
    pub default_model: String,
    pub default_audience: Audience,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            mode: CompositionMode::Strict,
            min_content_chars: MIN_CONTENT_CHARS,
            default_model: DEFAULT_MODEL.to_string(),
            default_audience: Audience::Business,
        }
    }
}

/// Parameters of one composition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content: String,
    pub model_id: String,
    pub audience: Audience,
    /// Accepted for hosted backends; local generation ignores it.
    pub api_token: Option<String>,
}

impl GenerationRequest {
    pub fn new(content: impl Into<String>, model_id: impl Into<String>, audience: Audience) -> Self {
        Self { content: content.into(), model_id: model_id.into(), audience, api_token: None }
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

/// Drives a generation backend through the newsletter prompts.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: ComposeConfig,
}

impl Composer {
    pub fn new(config: ComposeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Compose a newsletter for `request`.
    ///
    /// Content shorter than the configured minimum is rejected with
    /// [`NewsletterError::ContentTooShort`] in every mode, before the backend
    /// is touched. In lenient mode any later failure yields the rule-based
    /// newsletter instead of an error.
    pub async fn compose(&self, backend: &dyn GeneratorBackend, request: &GenerationRequest) -> Result<Newsletter> {
        self.compose_with_progress(backend, request, &NoProgress).await
    }

    /// [`Composer::compose`], reporting each generation call to `progress`.
    pub async fn compose_with_progress(
        &self, backend: &dyn GeneratorBackend, request: &GenerationRequest, progress: &dyn ComposeProgress,
    ) -> Result<Newsletter> {
        let length = request.content.trim().chars().count();
        if length < self.config.min_content_chars {
            return Err(NewsletterError::ContentTooShort { length, minimum: self.config.min_content_chars });
        }

        let composed = match backend.load(&request.model_id) {
            Ok(generator) => self.generate(generator.as_ref(), request, progress).await,
            Err(e) => Err(e),
        };

        match (composed, self.config.mode) {
            (Ok(newsletter), _) => Ok(newsletter),
            (Err(e), CompositionMode::Lenient) => {
                warn!(model = %request.model_id, error = %e, "model composition failed, using fallback");
                Ok(compose_fallback(&request.content))
            }
            (Err(e), CompositionMode::Strict) => Err(e),
        }
    }

    /// Run the four generation stages and validate the result.
    pub async fn compose_with_model(
        &self, generator: &dyn TextGenerator, request: &GenerationRequest,
    ) -> Result<Newsletter> {
        self.generate(generator, request, &NoProgress).await
    }

    async fn generate(
        &self, generator: &dyn TextGenerator, request: &GenerationRequest, progress: &dyn ComposeProgress,
    ) -> Result<Newsletter> {
        let style = prompt_style(&request.model_id);
        let params = SamplingParams::for_style(style);
        let content = request.content.as_str();
        let chunks = partition_sections(content);
        let stage = Stage { generator, params: &params, progress };

        progress.on_compose_start(3 + chunks.iter().filter(|chunk| !chunk.is_empty()).count());

        debug!(model = %request.model_id, ?style, "generating headline");
        let headline = stage
            .run(ComposeStage::Headline, &prompts::headline(style, content), prompts::HEADLINE_TOKENS)
            .await?;

        debug!("generating introduction");
        let introduction = stage
            .run(
                ComposeStage::Introduction,
                &prompts::introduction(style, content, request.audience),
                prompts::INTRODUCTION_TOKENS,
            )
            .await?;

        let mut sections = Vec::with_capacity(MAX_SECTIONS);
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.is_empty() {
                debug!(index, "skipping empty chunk");
                continue;
            }
            debug!(index, "generating section");
            let section = stage
                .run(ComposeStage::Section(index), &prompts::section(style, chunk, index), prompts::SECTION_TOKENS)
                .await?;
            if !section.is_empty() {
                sections.push(section);
            }
        }

        debug!("generating call to action");
        let cta = stage
            .run(
                ComposeStage::CallToAction,
                &prompts::call_to_action(style, &headline, request.audience),
                prompts::CTA_TOKENS,
            )
            .await?;

        let newsletter = Newsletter { headline, introduction, sections, cta };
        if let Err(e) = newsletter.validate() {
            debug!(
                headline = %newsletter.headline,
                introduction = %newsletter.introduction,
                sections = newsletter.sections.len(),
                "generated newsletter is incomplete"
            );
            return Err(e);
        }

        info!(model = %request.model_id, sections = newsletter.sections.len(), "newsletter composed");
        Ok(newsletter)
    }
}

/// One generation call with its progress events.
struct Stage<'a> {
    generator: &'a dyn TextGenerator,
    params: &'a SamplingParams,
    progress: &'a dyn ComposeProgress,
}

impl Stage<'_> {
    /// First line of the continuation for `prompt`.
    async fn run(&self, stage: ComposeStage, prompt: &str, max_new_tokens: usize) -> Result<String> {
        self.progress.on_stage_start(stage);
        let reply = self.generator.generate(prompt, max_new_tokens, self.params).await?;
        self.progress.on_stage_complete(stage);
        Ok(first_line(&reply))
    }
}

/// Split the non-empty lines of `content` into three contiguous chunks.
///
/// Each chunk gets `max(1, lines / 3)` lines and the last chunk also takes
/// the remainder. With fewer than three lines the trailing chunks are empty.
pub fn partition_sections(content: &str) -> [String; SECTION_CHUNKS] {
    let lines: Vec<&str> = content.lines().filter(|line| !line.trim().is_empty()).collect();
    let chunk_size = (lines.len() / SECTION_CHUNKS).max(1);

    std::array::from_fn(|i| {
        let start = (i * chunk_size).min(lines.len());
        let end = if i + 1 == SECTION_CHUNKS { lines.len() } else { ((i + 1) * chunk_size).min(lines.len()) };
        lines[start..end].join("\n")
    })
}

/// First non-blank line of a model continuation, trimmed.
fn first_line(text: &str) -> String {
    text.trim_start().lines().next().unwrap_or_default().trim().to_string()
}
