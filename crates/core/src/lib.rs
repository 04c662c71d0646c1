//! Turn web pages, PDFs, and DOCX files into short newsletters.
//!
//! Work happens in two stages. Extraction reduces a source to plain text;
//! composition drives a local text-generation model through four prompts
//! (headline, introduction, sections, call to action) and validates the
//! result. In lenient mode a rule-based composer stands in whenever the
//! model falls short.
//!
//! # Example
//!
//! ```rust,no_run
//! use newsletter_core::{ComposeOptions, Pipeline, Settings, Source};
//!
//! # async fn run() -> newsletter_core::Result<()> {
//! let pipeline = Pipeline::with_ollama(Settings::load(None)?)?;
//! let source = Source::Url("https://example.com/article".to_string());
//! let newsletter = pipeline.run(&source, &ComposeOptions::default()).await?;
//! println!("{}", newsletter.headline);
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod config;
pub mod docx;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod fetch;
pub mod generator;
pub mod model;
pub mod newsletter;
pub mod parse;
pub mod pdf;
pub mod pipeline;
pub mod preprocess;
pub mod progress;
pub mod prompts;
pub mod select;

pub use compose::{ComposeConfig, Composer, CompositionMode, GenerationRequest, MIN_CONTENT_CHARS, partition_sections};
pub use config::Settings;
pub use error::{NewsletterError, Result};
pub use extract::{ExtractConfig, ExtractMode, SourceKind, extract_text_from_html};
pub use extract::{extract_from_docx, extract_from_file, extract_from_pdf, extract_from_url};
pub use fallback::{FALLBACK_CTA, compose_fallback};
pub use fetch::{FetchConfig, fetch_url};
pub use generator::{GeneratorBackend, GeneratorConfig, OllamaBackend, TextGenerator};
pub use model::{DEFAULT_MODEL, MODELS, ModelInfo, PromptStyle, SamplingParams};
pub use newsletter::{Audience, AudienceInfo, Newsletter, audiences};
pub use pipeline::{ComposeOptions, Pipeline, Source};
pub use progress::{ComposeProgress, ComposeStage, NoProgress};
pub use select::{SelectionStrategy, select_content};
