//! HTML cleanup before content selection.
//!
//! Unwanted elements are removed with a streaming rewriter, so the page is
//! never parsed into a tree twice.

use lol_html::{HtmlRewriter, Selector, Settings, element};

use crate::{NewsletterError, Result};

/// Tags stripped before locating the content area.
pub const DEFAULT_REMOVED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Tags stripped by the enhanced extractor, which also drops menus and noscript fallbacks.
pub const ENHANCED_REMOVED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside", "menu", "noscript"];

/// Remove every element named in `tags`, including its content.
///
/// An empty tag list returns the input unchanged.
pub fn remove_elements(html: &str, tags: &[String]) -> Result<String> {
    if tags.is_empty() {
        return Ok(html.to_string());
    }

    for tag in tags {
        tag.parse::<Selector>()
            .map_err(|e| NewsletterError::HtmlParseError(format!("Invalid tag selector '{}': {}", tag, e)))?;
    }

    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: tags
                .iter()
                .map(|tag| {
                    element!(tag.as_str(), |el| {
                        el.remove();
                        Ok(())
                    })
                })
                .collect(),
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| NewsletterError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| NewsletterError::HtmlParseError(e.to_string()))?;

    Ok(String::from_utf8_lossy(&output).into_owned())
}
