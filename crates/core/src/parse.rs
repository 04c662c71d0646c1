//! HTML parsing and DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use newsletter_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><meta name="description" content="A short summary"></head>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.meta_description(), Some("A short summary".to_string()));
//! assert_eq!(doc.select("p.content").unwrap().len(), 1);
//! ```

use scraper::{Html, Selector};

use crate::{NewsletterError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps an HTML page and provides methods for querying elements
/// using CSS selectors and reading the few head fields extraction needs.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// Malformed markup never fails; the HTML5 parser recovers the way a
    /// browser would.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`NewsletterError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use newsletter_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector, in document order.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the trimmed title of the document, if present and non-empty.
    pub fn title(&self) -> Option<String> {
        let element = self.select_first("title").ok()??;
        non_empty(element.text())
    }

    /// Gets the `<meta name="description">` content, if present and non-empty.
    pub fn meta_description(&self) -> Option<String> {
        let element = self.select_first(r#"meta[name="description"]"#).ok()??;
        non_empty(element.attr("content")?.to_string())
    }

    /// Gets the `<body>` element.
    pub fn body(&'_ self) -> Option<Element<'_>> {
        self.select_first("body").ok().flatten()
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use newsletter_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Number of characters of visible text, ignoring surrounding whitespace.
    pub fn text_len(&self) -> usize {
        self.text().trim().chars().count()
    }

    /// Gets the text of this element as stripped, non-empty lines.
    ///
    /// Every text node is split on line breaks; each piece is trimmed and
    /// empty pieces are dropped.
    pub fn text_lines(&self) -> Vec<String> {
        self.element
            .text()
            .flat_map(|node| node.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| NewsletterError::HtmlParseError(format!("Invalid selector: {}", e)))
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
