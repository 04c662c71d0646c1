//! Extraction followed by composition, shared by every front end.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::compose::{Composer, GenerationRequest};
use crate::config::Settings;
use crate::extract::{SourceKind, extract_from_file, extract_from_url};
use crate::generator::{GeneratorBackend, OllamaBackend};
use crate::newsletter::{Audience, Newsletter};
use crate::progress::ComposeProgress;
use crate::{NewsletterError, Result};

/// Where content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    /// A `.pdf` or `.docx` file.
    File(PathBuf),
}

impl Source {
    pub fn kind(&self) -> Result<SourceKind> {
        match self {
            Source::Url(_) => Ok(SourceKind::Url),
            Source::File(path) => SourceKind::from_path(path),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Per-request choices; unset fields take the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    pub model_id: Option<String>,
    pub audience: Option<Audience>,
    pub api_token: Option<String>,
}

/// Extractor and composer bound to one set of settings and one backend.
///
/// Holds no per-request state, so a single pipeline can serve concurrent
/// requests.
#[derive(Clone)]
pub struct Pipeline {
    settings: Settings,
    backend: Arc<dyn GeneratorBackend>,
    composer: Composer,
}

impl Pipeline {
    pub fn new(settings: Settings, backend: Arc<dyn GeneratorBackend>) -> Self {
        let composer = Composer::new(settings.compose.clone());
        Self { settings, backend, composer }
    }

    /// Pipeline backed by the Ollama runtime named in `settings`.
    pub fn with_ollama(settings: Settings) -> Result<Self> {
        let backend = OllamaBackend::new(settings.generator.clone())?;
        Ok(Self::new(settings, Arc::new(backend)))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extract plain text from `source`.
    ///
    /// A single attempt; every fetch, parse, or file error collapses into
    /// [`NewsletterError::ExtractionFailed`]. Unsupported file extensions
    /// are reported as such, before anything is read.
    pub async fn extract(&self, source: &Source) -> Result<String> {
        let text = match source {
            Source::Url(url) => extract_from_url(url, &self.settings.fetch, &self.settings.extract).await,
            Source::File(path) => {
                SourceKind::from_path(path)?;
                let path = path.clone();
                tokio::task::spawn_blocking(move || extract_from_file(&path))
                    .await
                    .unwrap_or_else(|e| {
                        warn!(error = %e, "extraction task failed");
                        None
                    })
            }
        };

        match text {
            Some(text) => {
                info!(source = %source, chars = text.chars().count(), "content extracted");
                Ok(text)
            }
            None => Err(NewsletterError::ExtractionFailed(source.to_string())),
        }
    }

    /// Build a request for `content`, filling unset options from settings.
    pub fn request(&self, content: impl Into<String>, options: &ComposeOptions) -> GenerationRequest {
        let defaults = &self.settings.compose;
        let model_id = options
            .model_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&defaults.default_model);

        GenerationRequest::new(content, model_id, options.audience.unwrap_or(defaults.default_audience))
            .with_api_token(options.api_token.clone())
    }

    /// Compose a newsletter in the configured mode.
    pub async fn compose(&self, request: &GenerationRequest) -> Result<Newsletter> {
        self.composer.compose(self.backend.as_ref(), request).await
    }

    /// [`Pipeline::compose`], reporting each generation call to `progress`.
    pub async fn compose_with_progress(
        &self, request: &GenerationRequest, progress: &dyn ComposeProgress,
    ) -> Result<Newsletter> {
        self.composer.compose_with_progress(self.backend.as_ref(), request, progress).await
    }

    /// Extract `source` and compose a newsletter from it.
    pub async fn run(&self, source: &Source, options: &ComposeOptions) -> Result<Newsletter> {
        let content = self.extract(source).await?;
        self.compose(&self.request(content, options)).await
    }
}
