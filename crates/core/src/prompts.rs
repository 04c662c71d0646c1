//! Prompt templates for newsletter composition.
//!
//! Each part of the newsletter has a plain continuation prompt for base
//! models and an instruction prompt for chat models. [`frame`] wraps the
//! instruction in the chat turn markers.

use crate::model::PromptStyle;
use crate::newsletter::Audience;

/// Characters of content shown to the headline and introduction prompts.
pub const CONTENT_WINDOW: usize = 1000;

/// Characters of a section chunk shown to its prompt.
pub const SECTION_WINDOW: usize = 500;

pub const HEADLINE_TOKENS: usize = 20;
pub const INTRODUCTION_TOKENS: usize = 100;
pub const SECTION_TOKENS: usize = 200;
pub const CTA_TOKENS: usize = 50;

/// Wrap an instruction for the model family.
pub fn frame(style: PromptStyle, instruction: &str) -> String {
    match style {
        PromptStyle::Completion => instruction.to_string(),
        PromptStyle::Chat => format!("<|user|>\n{}\n\n<|assistant|>\n", instruction),
    }
}

pub fn headline(style: PromptStyle, content: &str) -> String {
    let excerpt = truncate_chars(content, CONTENT_WINDOW);
    match style {
        PromptStyle::Completion => format!(
            "Article: {}\n\nBased on the given content give 4-9 words of Headline for newsletter: ",
            excerpt
        ),
        PromptStyle::Chat => frame(
            style,
            &format!(
                "Based on this article content, create a 4-9 word headline for a newsletter:\n\n{}",
                excerpt
            ),
        ),
    }
}

pub fn introduction(style: PromptStyle, content: &str, audience: Audience) -> String {
    let excerpt = truncate_chars(content, CONTENT_WINDOW);
    match style {
        PromptStyle::Completion => format!(
            "Article: {}\n\nIntroduction for {} readers: This article covers ",
            excerpt,
            audience.id()
        ),
        PromptStyle::Chat => frame(
            style,
            &format!(
                "Write a brief introduction for a newsletter aimed at {} readers, based on this article:\n\n{}",
                audience.id(),
                excerpt
            ),
        ),
    }
}

/// Prompt for section `index` (zero-based).
pub fn section(style: PromptStyle, chunk: &str, index: usize) -> String {
    let excerpt = truncate_chars(chunk, SECTION_WINDOW);
    match style {
        PromptStyle::Completion => format!("Content: {}\n\nSection {}: ", excerpt, index + 1),
        PromptStyle::Chat => frame(
            style,
            &format!("Write a newsletter section based on this content:\n\n{}", excerpt),
        ),
    }
}

pub fn call_to_action(style: PromptStyle, headline: &str, audience: Audience) -> String {
    match style {
        PromptStyle::Completion => format!(
            "Title: {}\n\nCall to Action for {} readers: ",
            headline,
            audience.id()
        ),
        PromptStyle::Chat => frame(
            style,
            &format!(
                "Write a call to action for {} readers of a newsletter with this headline: {}",
                audience.id(),
                headline
            ),
        ),
    }
}

/// The first `max` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 10), "hi");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_headline_prompt_truncates_content() {
        let content = "x".repeat(CONTENT_WINDOW + 500);
        let prompt = headline(PromptStyle::Completion, &content);

        assert_eq!(prompt.matches('x').count(), CONTENT_WINDOW);
        assert!(prompt.ends_with("Headline for newsletter: "));
    }

    #[test]
    fn test_chat_prompts_use_turn_markers() {
        let prompt = headline(PromptStyle::Chat, "Some article");

        assert!(prompt.starts_with("<|user|>\n"));
        assert!(prompt.ends_with("<|assistant|>\n"));
        assert!(prompt.contains("Some article"));
    }

    #[test]
    fn test_audience_in_introduction_and_cta() {
        let intro = introduction(PromptStyle::Completion, "Body", Audience::Technical);
        let cta = call_to_action(PromptStyle::Chat, "Big News", Audience::Business);

        assert!(intro.contains("technical readers"));
        assert!(cta.contains("business readers"));
        assert!(cta.contains("Big News"));
    }

    #[test]
    fn test_section_prompt_numbering() {
        assert!(section(PromptStyle::Completion, "chunk", 0).ends_with("Section 1: "));
        assert!(section(PromptStyle::Completion, "chunk", 2).ends_with("Section 3: "));
    }
}
