//! Rule-based newsletter composition.
//!
//! Used when the model path fails in lenient mode. Works from the content
//! alone and always produces a newsletter that passes
//! [`Newsletter::validate`] for content of at least 50 characters.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::{SUMMARY_PREFIX, TITLE_PREFIX};
use crate::newsletter::{MAX_SECTIONS, MIN_HEADLINE_CHARS, MIN_SECTION_CHARS, Newsletter};
use crate::prompts::truncate_chars;

/// Headline used when the content carries no title line.
pub const FALLBACK_HEADLINE: &str = "Newsletter";

/// Introduction used when the content carries no summary line.
pub const FALLBACK_INTRODUCTION: &str = "This edition brings together the key points from the source material.";

/// Sentence appended to a summary to form the introduction.
pub const SUMMARY_FOLLOW_UP: &str = "Here are the highlights worth your attention.";

/// Call to action of every fallback newsletter.
pub const FALLBACK_CTA: &str =
    "Stay informed: subscribe for future editions and share this newsletter with anyone who would find it useful.";

/// Paragraphs must be longer than this to become a section.
const MIN_PARAGRAPH_CHARS: usize = 80;

/// Sentences must be longer than this to seed a section.
const MIN_SENTENCE_CHARS: usize = 60;

/// Sentences are packed into sections up to this length.
const MAX_SECTION_CHARS: usize = 200;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("sentence pattern is valid"));

/// Build a newsletter from `content` without a model.
pub fn compose_fallback(content: &str) -> Newsletter {
    let (headline, rest) = match take_prefixed_line(content, TITLE_PREFIX) {
        Some((title, rest)) if title.chars().count() >= MIN_HEADLINE_CHARS => (title.to_string(), rest),
        Some((_, rest)) => (FALLBACK_HEADLINE.to_string(), rest),
        None => (FALLBACK_HEADLINE.to_string(), content),
    };

    let (introduction, body) = match take_prefixed_line(rest, SUMMARY_PREFIX) {
        Some((summary, rest)) if !summary.is_empty() => (format!("{} {}", summary, SUMMARY_FOLLOW_UP), rest),
        Some((_, rest)) => (FALLBACK_INTRODUCTION.to_string(), rest),
        None => (FALLBACK_INTRODUCTION.to_string(), rest),
    };

    let mut sections = paragraph_sections(body);
    if sections.len() < 2 {
        sections = sentence_sections(body);
    }
    if sections.is_empty() {
        let source = if body.trim().is_empty() { content.trim() } else { body.trim() };
        sections.push(truncate_chars(source, MAX_SECTION_CHARS).trim().to_string());
    }
    if !sections.iter().any(|section| section.chars().count() > MIN_SECTION_CHARS) {
        sections = vec![truncate_chars(content.trim(), MAX_SECTION_CHARS).trim().to_string()];
    }
    sections.truncate(MAX_SECTIONS);

    Newsletter { headline, introduction, sections, cta: FALLBACK_CTA.to_string() }
}

/// Split off a leading `prefix` line. Returns the trimmed line value and the
/// text after it with leading blank lines removed.
fn take_prefixed_line<'a>(text: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let text = text.trim_start();
    let line_and_rest = text.strip_prefix(prefix)?;
    let (line, rest) = line_and_rest.split_once('\n').unwrap_or((line_and_rest, ""));
    Some((line.trim(), rest.trim_start()))
}

fn paragraph_sections(body: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(body)
        .map(str::trim)
        .filter(|paragraph| paragraph.chars().count() > MIN_PARAGRAPH_CHARS)
        .map(str::to_string)
        .collect()
}

fn sentence_sections(body: &str) -> Vec<String> {
    let sentences: Vec<&str> = SENTENCE
        .find_iter(body)
        .map(|m| m.as_str().trim())
        .filter(|sentence| !sentence.is_empty())
        .collect();

    let (long, short): (Vec<&str>, Vec<&str>) =
        sentences.into_iter().partition(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS);

    let mut sections = pack(&long);
    if sections.len() < 2 {
        for section in pack(&short) {
            if sections.len() >= 2 {
                break;
            }
            sections.push(section);
        }
    }
    sections
}

/// Greedily join consecutive sentences while the section stays within
/// [`MAX_SECTION_CHARS`]. A single longer sentence forms its own section.
fn pack(sentences: &[&str]) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for sentence in sentences {
        if current.is_empty() {
            current.push_str(sentence);
        } else if current.chars().count() + 1 + sentence.chars().count() <= MAX_SECTION_CHARS {
            current.push(' ');
            current.push_str(sentence);
        } else {
            sections.push(std::mem::take(&mut current));
            current.push_str(sentence);
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MARKETS: &str = "Title: Markets Rally\n\nSummary: Stocks rose today.\n\nBody text that is definitely longer than eighty characters to qualify as a paragraph section one.\n\nAnother paragraph also exceeding eighty characters so it qualifies as a second section here.";

    #[test]
    fn test_title_and_summary_lines() {
        let newsletter = compose_fallback(MARKETS);

        assert_eq!(newsletter.headline, "Markets Rally");
        assert!(newsletter.introduction.starts_with("Stocks rose today."));
        assert!(newsletter.introduction.ends_with(SUMMARY_FOLLOW_UP));
        assert_eq!(newsletter.sections.len(), 2);
        assert!(newsletter.sections[0].starts_with("Body text"));
        assert!(newsletter.sections[1].starts_with("Another paragraph"));
        assert_eq!(newsletter.cta, FALLBACK_CTA);
    }

    #[test]
    fn test_without_title_or_summary() {
        let content = "Plain article text without any headers that still runs well past fifty characters in total.";
        let newsletter = compose_fallback(content);

        assert_eq!(newsletter.headline, FALLBACK_HEADLINE);
        assert_eq!(newsletter.introduction, FALLBACK_INTRODUCTION);
        assert!(newsletter.validate().is_ok());
    }

    #[test]
    fn test_sentence_packing_when_paragraphs_are_short() {
        let content = "The first sentence here is long enough to pass the sixty character limit. \
                       The second sentence is also comfortably longer than sixty characters total. \
                       A third sentence that crosses the sixty character mark keeps things going. \
                       Short one.";
        let newsletter = compose_fallback(content);

        assert!(newsletter.sections.len() >= 2);
        assert!(newsletter.sections.iter().all(|s| s.chars().count() <= MAX_SECTION_CHARS));
        assert!(newsletter.sections[0].starts_with("The first sentence"));
    }

    #[test]
    fn test_short_sentences_pad_sections() {
        let content = "This opening sentence is clearly longer than sixty characters in length. Tiny. Also tiny.";
        let newsletter = compose_fallback(content);

        assert_eq!(newsletter.sections.len(), 2);
        assert_eq!(newsletter.sections[1], "Tiny. Also tiny.");
    }

    #[test]
    fn test_at_most_three_sections() {
        let paragraph = "x".repeat(120);
        let content = vec![paragraph; 6].join("\n\n");
        assert_eq!(compose_fallback(&content).sections.len(), MAX_SECTIONS);
    }

    #[test]
    fn test_title_only_content_uses_whole_text() {
        let content = "Title: A headline that carries all the content we have today";
        let newsletter = compose_fallback(content);

        assert_eq!(newsletter.sections.len(), 1);
        assert!(newsletter.sections[0].starts_with("Title: "));
    }

    #[rstest]
    #[case("Title: Short\n\nSummary: Brief.\n\nOne two three four five six seven eight nine ten.")]
    #[case("no punctuation at all but plenty of words to pass the fifty char minimum")]
    #[case("Title: \n\nSummary: \n\nEmpty header values followed by enough text to count as content.")]
    #[case("!!!.... ??? ... !!! ... ??? ... !!! ... ??? ... !!! ... ??? ... !!! ...")]
    #[case("Ünïcödé text çontent with àccents everywhere. Ñoño. Straße für Größe und Maß überall hier.")]
    fn test_always_structurally_valid(#[case] content: &str) {
        let newsletter = compose_fallback(content);

        assert!(!newsletter.headline.trim().is_empty());
        assert!(newsletter.introduction.chars().count() >= 10);
        assert!((1..=MAX_SECTIONS).contains(&newsletter.sections.len()));
        assert_eq!(newsletter.cta, FALLBACK_CTA);
        assert!(newsletter.validate().is_ok());
    }

    #[rstest]
    #[case("Title: Hi\n\nSummary: A short summary of the page.\n\nOk. Fine. Yes.")]
    #[case("Title: Tiny\n\nNo. Yes. Maybe so. Fine then. Sure thing. All good here.")]
    #[case("Short. Bits. Only. Here. And. There. Again. More. Still. Done. Yes. Okay.")]
    fn test_short_title_and_sections_still_validate(#[case] content: &str) {
        let newsletter = compose_fallback(content);

        assert!(newsletter.validate().is_ok(), "{:?}", newsletter);
        assert!(newsletter.sections.iter().all(|s| s.chars().count() <= MAX_SECTION_CHARS));
    }

    #[test]
    fn test_short_title_uses_default_headline() {
        let newsletter = compose_fallback("Title: Hi\n\nSummary: A short summary of the page.\n\nOk. Fine. Yes.");

        assert_eq!(newsletter.headline, FALLBACK_HEADLINE);
        assert!(newsletter.introduction.starts_with("A short summary of the page."));
        assert_eq!(newsletter.sections.len(), 1);
        assert!(newsletter.sections[0].starts_with("Title: Hi"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(compose_fallback(MARKETS), compose_fallback(MARKETS));
    }
}
