use newsletter_core::Newsletter;
use newsletter_core::prompts::truncate_chars;
use owo_colors::OwoColorize;

use crate::VERSION;

/// Width of the `=` rules around printed content.
const BORDER_WIDTH: usize = 50;

/// Extracted text beyond this many characters is elided on screen.
pub const EXTRACT_PREVIEW_CHARS: usize = 3500;

/// Print a styled banner for verbose and interactive mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Newsletter".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Generate newsletters from web pages and documents\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print a numbered menu
pub fn print_menu(title: &str, options: &[String]) {
    eprintln!("\n{}", title.bold());
    for (i, option) in options.iter().enumerate() {
        eprintln!("  {} {}", format!("{}.", i + 1).dimmed(), option);
    }
}

fn rule() -> String {
    "=".repeat(BORDER_WIDTH)
}

/// Print a newsletter in a bordered, human-readable layout
pub fn print_newsletter(newsletter: &Newsletter) {
    println!("\n{}", rule().dimmed());
    println!("{}", "GENERATED NEWSLETTER".bold().cyan());
    println!("{}", rule().dimmed());

    println!("\n📰 {}", newsletter.headline.bold());
    println!("\n{}", newsletter.introduction);

    for (i, section) in newsletter.sections.iter().enumerate() {
        println!("\n📋 {} {}", format!("Section {}:", i + 1).bold(), section);
    }

    println!("\n🎯 {} {}", "Call to Action:".bold(), newsletter.cta);
    println!("{}", rule().dimmed());
}

/// Print extracted text, elided after [`EXTRACT_PREVIEW_CHARS`], with its length
pub fn print_extracted(content: &str) {
    let length = content.chars().count();

    println!("\n{}", rule().dimmed());
    println!("{}", "EXTRACTED CONTENT".bold().cyan());
    println!("{}", rule().dimmed());
    if length > EXTRACT_PREVIEW_CHARS {
        println!("{}...", truncate_chars(content, EXTRACT_PREVIEW_CHARS));
    } else {
        println!("{}", content);
    }
    println!("{}", rule().dimmed());
    println!("Content length: {} characters", length);
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
