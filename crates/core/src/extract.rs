//! Plain-text extraction from web pages, PDFs, and DOCX files.
//!
//! The `extract_from_*` functions are the pipeline-facing entry points: they
//! never propagate errors, logging the cause and returning `None` instead.
//! Callers cannot tell a network failure from a corrupt file or an empty
//! page, and must treat `None` as fatal for the request. The `try_*`
//! functions expose the underlying [`Result`] for callers that want it.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::docx::extract_docx_text;
use crate::fetch::{FetchConfig, fetch_url};
use crate::parse::Document;
use crate::pdf::extract_pdf_text;
use crate::preprocess::{DEFAULT_REMOVED_TAGS, ENHANCED_REMOVED_TAGS, remove_elements};
use crate::select::{Selection, SelectionStrategy, select_content};
use crate::{NewsletterError, Result};

/// Prefix of the page-title line the enhanced extractor emits.
pub const TITLE_PREFIX: &str = "Title: ";

/// Prefix of the meta-description line the enhanced extractor emits.
pub const SUMMARY_PREFIX: &str = "Summary: ";

/// Web page extraction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Selector probing, falling back to `<body>`.
    #[default]
    Basic,
    /// Longer selector list, block scoring, short-line filtering, and
    /// `Title:`/`Summary:` header lines.
    Enhanced,
}

impl FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "enhanced" => Ok(Self::Enhanced),
            _ => Err(format!("Invalid extraction mode: {}. Valid options: basic, enhanced", s)),
        }
    }
}

/// Configuration for web page extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Elements removed, with their content, before selection.
    pub removed_tags: Vec<String>,
    /// How the content element is located.
    pub strategy: SelectionStrategy,
    /// Lines of this many characters or fewer are dropped.
    pub min_line_chars: usize,
    /// Prefix the text with `Title:` and `Summary:` lines when available.
    pub include_head: bool,
}

impl ExtractConfig {
    /// Settings for the given extraction variant.
    pub fn for_mode(mode: ExtractMode) -> Self {
        match mode {
            ExtractMode::Basic => Self {
                removed_tags: DEFAULT_REMOVED_TAGS.iter().map(|t| t.to_string()).collect(),
                strategy: SelectionStrategy::basic(),
                min_line_chars: 0,
                include_head: false,
            },
            ExtractMode::Enhanced => Self {
                removed_tags: ENHANCED_REMOVED_TAGS.iter().map(|t| t.to_string()).collect(),
                strategy: SelectionStrategy::enhanced(),
                min_line_chars: 10,
                include_head: true,
            },
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::for_mode(ExtractMode::Basic)
    }
}

/// Kind of source a piece of text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Url,
    Pdf,
    Docx,
}

impl SourceKind {
    /// File kind from a path's extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`NewsletterError::UnsupportedFileType`] for anything but
    /// `.pdf` and `.docx`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "" => Err(NewsletterError::UnsupportedFileType(path.display().to_string())),
            other => Err(NewsletterError::UnsupportedFileType(other.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Url => write!(f, "URL"),
            SourceKind::Pdf => write!(f, "PDF"),
            SourceKind::Docx => write!(f, "DOCX"),
        }
    }
}

/// Extract normalized plain text from an HTML page.
///
/// # Example
///
/// ```rust
/// use newsletter_core::{ExtractConfig, extract_text_from_html};
///
/// let html = "<html><body><nav>Home</nav><article><p>Hello</p>\n<p>World</p></article></body></html>";
/// let text = extract_text_from_html(html, &ExtractConfig::default()).unwrap();
/// assert_eq!(text, "Hello\nWorld");
/// ```
pub fn extract_text_from_html(html: &str, config: &ExtractConfig) -> Result<String> {
    let cleaned = remove_elements(html, &config.removed_tags)?;
    let doc = Document::parse(&cleaned)?;

    let selection = select_content(&doc, &config.strategy)?.ok_or(NewsletterError::NoContent)?;
    match &selection {
        Selection::Selector { selector, .. } => debug!(%selector, "content area matched selector"),
        Selection::BestCandidate { length, .. } => debug!(length, "content area chosen by text length"),
        Selection::Body(_) => debug!("no content area found, using body"),
    }

    let body = selection
        .element()
        .text_lines()
        .into_iter()
        .filter(|line| line.chars().count() > config.min_line_chars)
        .collect::<Vec<_>>()
        .join("\n");

    let mut text = String::new();
    if config.include_head {
        if let Some(title) = doc.title() {
            text.push_str(&format!("{}{}\n\n", TITLE_PREFIX, title));
        }
        if let Some(summary) = doc.meta_description() {
            text.push_str(&format!("{}{}\n\n", SUMMARY_PREFIX, summary));
        }
    }
    text.push_str(&body);

    if text.trim().is_empty() {
        return Err(NewsletterError::NoContent);
    }

    Ok(text)
}

/// Fetch `url` and extract its text.
pub async fn try_extract_from_url(url: &str, fetch: &FetchConfig, config: &ExtractConfig) -> Result<String> {
    let html = fetch_url(url, fetch).await?;
    extract_text_from_html(&html, config)
}

/// Extract the text of a PDF or DOCX file, chosen by extension.
pub fn try_extract_from_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(NewsletterError::FileNotFound(path.to_path_buf()));
    }

    match SourceKind::from_path(path)? {
        SourceKind::Pdf => extract_pdf_text(path),
        SourceKind::Docx => extract_docx_text(path),
        SourceKind::Url => Err(NewsletterError::UnsupportedFileType(path.display().to_string())),
    }
    .and_then(require_text)
}

/// Fetch `url` and extract its text, or `None` on any failure.
pub async fn extract_from_url(url: &str, fetch: &FetchConfig, config: &ExtractConfig) -> Option<String> {
    info!(%url, "fetching content");
    let result = try_extract_from_url(url, fetch, config).await;
    absent_on_error(SourceKind::Url, url, result)
}

/// Extract the text of a PDF file, or `None` on any failure.
pub fn extract_from_pdf(path: &Path) -> Option<String> {
    info!(path = %path.display(), "extracting text from PDF");
    let result = extract_pdf_text(path).and_then(require_text);
    absent_on_error(SourceKind::Pdf, &path.display().to_string(), result)
}

/// Extract the text of a DOCX file, or `None` on any failure.
pub fn extract_from_docx(path: &Path) -> Option<String> {
    info!(path = %path.display(), "extracting text from DOCX");
    let result = extract_docx_text(path).and_then(require_text);
    absent_on_error(SourceKind::Docx, &path.display().to_string(), result)
}

/// Extract the text of a PDF or DOCX file, or `None` on any failure
/// (including an unsupported extension).
pub fn extract_from_file(path: &Path) -> Option<String> {
    info!(path = %path.display(), "extracting text from file");
    let result = try_extract_from_file(path);
    absent_on_error("file", &path.display().to_string(), result)
}

fn require_text(text: String) -> Result<String> {
    if text.trim().is_empty() { Err(NewsletterError::NoContent) } else { Ok(text) }
}

fn absent_on_error(kind: impl fmt::Display, origin: &str, result: Result<String>) -> Option<String> {
    match result {
        Ok(text) => {
            info!(source = %kind, chars = text.chars().count(), "extracted content");
            Some(text)
        }
        Err(e) => {
            warn!(source = %kind, %origin, error = %e, "extraction failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NEWS_PAGE: &str = r#"
        <html>
        <head>
            <title>Markets Rally</title>
            <meta name="description" content="Stocks rose today.">
            <style>body { color: red; }</style>
        </head>
        <body>
            <header>Site header</header>
            <nav><a href="/">Home</a></nav>
            <div class="content">
                <h1>Markets Rally</h1>
                <p>Stocks climbed across every major index this afternoon.</p>
                <p>Short</p>
                <p>Analysts pointed to falling bond yields and strong earnings.</p>
            </div>
            <aside>Related links</aside>
            <footer>Copyright</footer>
            <script>track();</script>
        </body>
        </html>
    "#;

    #[rstest]
    #[case("report.pdf", SourceKind::Pdf)]
    #[case("REPORT.PDF", SourceKind::Pdf)]
    #[case("notes.docx", SourceKind::Docx)]
    #[case("dir/Notes.DocX", SourceKind::Docx)]
    fn test_source_kind_from_path(#[case] path: &str, #[case] expected: SourceKind) {
        assert_eq!(SourceKind::from_path(Path::new(path)).unwrap(), expected);
    }

    #[rstest]
    #[case("notes.txt")]
    #[case("archive.doc")]
    #[case("no_extension")]
    fn test_unsupported_extension(#[case] path: &str) {
        assert!(matches!(
            SourceKind::from_path(Path::new(path)),
            Err(NewsletterError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_basic_extraction() {
        let text = extract_text_from_html(NEWS_PAGE, &ExtractConfig::default()).unwrap();

        assert_eq!(
            text,
            "Markets Rally\nStocks climbed across every major index this afternoon.\nShort\nAnalysts pointed to falling bond yields and strong earnings."
        );
    }

    #[test]
    fn test_basic_extraction_strips_chrome() {
        let html = "<body><header>Top</header><p>Only paragraph</p><footer>Bottom</footer><script>x()</script></body>";
        let text = extract_text_from_html(html, &ExtractConfig::default()).unwrap();
        assert_eq!(text, "Only paragraph");
    }

    #[test]
    fn test_enhanced_extraction_adds_head_and_drops_short_lines() {
        let html = NEWS_PAGE.replace(
            r#"<div class="content">"#,
            r#"<div class="content"><p>Markets opened higher on Monday as investors returned from the holiday weekend with renewed optimism about growth.</p>"#,
        );
        let text = extract_text_from_html(&html, &ExtractConfig::for_mode(ExtractMode::Enhanced)).unwrap();

        assert!(text.starts_with("Title: Markets Rally\n\nSummary: Stocks rose today.\n\n"));
        assert!(text.contains("Analysts pointed to falling bond yields"));
        assert!(!text.lines().any(|line| line == "Short"));
        assert!(!text.contains("Related links"));
    }

    #[test]
    fn test_empty_page_is_no_content() {
        let result = extract_text_from_html("<html><body>   </body></html>", &ExtractConfig::default());
        assert!(matches!(result, Err(NewsletterError::NoContent)));
    }

    #[test]
    fn test_extract_mode_from_str() {
        assert_eq!("enhanced".parse::<ExtractMode>().unwrap(), ExtractMode::Enhanced);
        assert_eq!("BASIC".parse::<ExtractMode>().unwrap(), ExtractMode::Basic);
        assert!("fancy".parse::<ExtractMode>().is_err());
    }

    #[test]
    fn test_missing_file_is_absent() {
        assert!(extract_from_file(Path::new("/nonexistent/file.pdf")).is_none());
        assert!(matches!(
            try_extract_from_file(Path::new("/nonexistent/file.pdf")),
            Err(NewsletterError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_unsupported_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();

        assert!(extract_from_file(&path).is_none());
        assert!(matches!(try_extract_from_file(&path), Err(NewsletterError::UnsupportedFileType(_))));
    }

    #[test]
    fn test_blank_docx_is_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default()).unwrap();
        std::io::Write::write_all(
            &mut zip,
            br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#,
        )
        .unwrap();
        zip.finish().unwrap();

        assert!(matches!(try_extract_from_file(&path), Err(NewsletterError::NoContent)));
        assert!(extract_from_file(&path).is_none());
    }

    #[test]
    fn test_corrupt_pdf_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, "not really a pdf").unwrap();

        assert!(extract_from_pdf(&path).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_url_is_absent() {
        let fetch = FetchConfig { timeout: 2, ..Default::default() };
        let result = extract_from_url("http://127.0.0.1:9/article", &fetch, &ExtractConfig::default()).await;
        assert!(result.is_none());
    }
}
