//! Content-area selection.
//!
//! Picking the element that holds a page's main text is the one real
//! decision in URL extraction. [`select_content`] applies a
//! [`SelectionStrategy`] in three stages:
//!
//! 1. the first element matching the ordered selector list (most specific
//!    first), optionally requiring a minimum amount of text;
//! 2. when nothing matches, the candidate with the most visible text above a
//!    minimum, if the strategy scores candidates;
//! 3. the document `<body>`.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::parse::{Document, Element};

/// Content-area selectors tried by the basic extractor.
pub const BASIC_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    "main",
    ".main-content",
];

/// Content-area selectors tried by the enhanced extractor.
pub const ENHANCED_SELECTORS: &[&str] = &[
    // news and blogs
    "article",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".story-content",
    ".content-body",
    // generic content areas
    "[role=\"main\"]",
    "main",
    ".main-content",
    ".content",
    ".body-content",
    // common platforms
    ".post-body",
    ".article-body",
    ".story-body",
    ".content-area",
    // last resort
    ".text-content",
    ".article-text",
    ".post-text",
];

/// Tags scored by visible-text length when no selector matches.
pub const CANDIDATE_TAGS: &[&str] = &["p", "div", "section"];

/// Ordered rules for locating the main content element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStrategy {
    /// CSS selectors, most specific first.
    pub selectors: Vec<String>,
    /// A selector match counts only if its trimmed text is longer than this.
    pub min_match_chars: Option<usize>,
    /// Tags considered by the largest-text-block fallback.
    pub candidate_tags: Vec<String>,
    /// Candidates must have more trimmed text than this; `None` disables scoring.
    pub min_candidate_chars: Option<usize>,
}

impl SelectionStrategy {
    /// First selector match wins, otherwise `<body>`.
    pub fn basic() -> Self {
        Self {
            selectors: to_strings(BASIC_SELECTORS),
            min_match_chars: None,
            candidate_tags: Vec::new(),
            min_candidate_chars: None,
        }
    }

    /// Longer selector list, a 100-character floor on matches, and
    /// largest-block scoring over 200 characters before falling back to `<body>`.
    pub fn enhanced() -> Self {
        Self {
            selectors: to_strings(ENHANCED_SELECTORS),
            min_match_chars: Some(100),
            candidate_tags: to_strings(CANDIDATE_TAGS),
            min_candidate_chars: Some(200),
        }
    }
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        Self::basic()
    }
}

/// Which stage of the strategy produced the content element.
#[derive(Debug, Clone)]
pub enum Selection<'a> {
    /// Matched an entry of the selector list.
    Selector { selector: String, element: Element<'a> },
    /// Largest qualifying text block.
    BestCandidate { length: usize, element: Element<'a> },
    /// Nothing better; the whole body.
    Body(Element<'a>),
}

impl<'a> Selection<'a> {
    /// The chosen element.
    pub fn element(&self) -> &Element<'a> {
        match self {
            Selection::Selector { element, .. } | Selection::BestCandidate { element, .. } => element,
            Selection::Body(element) => element,
        }
    }
}

/// Locate the main content element of `doc` according to `strategy`.
///
/// Returns `Ok(None)` only when the document has no `<body>` and nothing
/// else qualified.
///
/// # Errors
///
/// Returns [`crate::NewsletterError::HtmlParseError`] if a selector in the
/// strategy is invalid.
pub fn select_content<'a>(doc: &'a Document, strategy: &SelectionStrategy) -> Result<Option<Selection<'a>>> {
    for selector in &strategy.selectors {
        if let Some(element) = doc.select_first(selector)?
            && strategy.min_match_chars.is_none_or(|min| element.text_len() > min)
        {
            return Ok(Some(Selection::Selector { selector: selector.clone(), element }));
        }
    }

    if let Some(min) = strategy.min_candidate_chars
        && let Some((length, element)) = best_candidate(doc, &strategy.candidate_tags, min)?
    {
        return Ok(Some(Selection::BestCandidate { length, element }));
    }

    Ok(doc.body().map(Selection::Body))
}

/// The element with the most trimmed text among `tags`, in document order,
/// if any exceeds `min_chars`. Ties keep the earliest element.
fn best_candidate<'a>(doc: &'a Document, tags: &[String], min_chars: usize) -> Result<Option<(usize, Element<'a>)>> {
    if tags.is_empty() {
        return Ok(None);
    }

    let mut best: Option<(usize, Element<'a>)> = None;
    for element in doc.select(&tags.join(", "))? {
        let length = element.text_len();
        if length > min_chars && best.as_ref().is_none_or(|(max, _)| length > *max) {
            best = Some((length, element));
        }
    }

    Ok(best)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
