mod echo;
mod interactive;
mod progress;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use newsletter_core::{
    Audience, ComposeOptions, CompositionMode, ExtractConfig, ExtractMode, Newsletter, Pipeline, Settings, Source,
};
use owo_colors::OwoColorize;

use crate::echo::{
    format_size, print_banner, print_error, print_extracted, print_info, print_newsletter, print_step, print_success,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate newsletters from web pages, PDFs, and DOCX files with a local model
#[derive(Parser, Debug)]
#[command(name = "newsletter")]
#[command(author = "Newsletter Contributors")]
#[command(version)]
#[command(about = "Generate newsletters from web pages and documents using a local model", long_about = None)]
struct Args {
    /// URL to extract content from
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    url: Option<String>,

    /// PDF or DOCX file to extract content from
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "newsletter.json", value_name = "FILE")]
    output: PathBuf,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Only extract content, skip generation
    #[arg(long)]
    extract_only: bool,

    /// Local model name (examples: gpt2, distilgpt2, EleutherAI/gpt-neo-125M)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Audience type (business, technical)
    #[arg(long, value_name = "AUDIENCE")]
    audience: Option<Audience>,

    /// API token for hosted model backends
    #[arg(long, value_name = "TOKEN")]
    api_token: Option<String>,

    /// Use enhanced web page extraction
    #[arg(long)]
    enhanced: bool,

    /// Fail instead of falling back when the model output is incomplete
    /// (without it the CLI always falls back, whatever the settings file says)
    #[arg(long)]
    strict: bool,

    /// Settings file (default: ~/.config/newsletter/config.toml); its
    /// `[compose] mode` is replaced by the --strict choice
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn source(&self) -> Option<Source> {
        match (&self.url, &self.file) {
            (Some(url), _) => Some(Source::Url(url.clone())),
            (None, Some(path)) => Some(Source::File(path.clone())),
            (None, None) => None,
        }
    }

    fn compose_options(&self) -> ComposeOptions {
        ComposeOptions { model_id: self.model.clone(), audience: self.audience, api_token: self.api_token.clone() }
    }

    /// Settings file contents with command-line choices applied on top.
    ///
    /// The composition mode always comes from `--strict`: lenient unless the
    /// flag is given.
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref()).context("Failed to load settings")?;

        settings.compose.mode = if self.strict { CompositionMode::Strict } else { CompositionMode::Lenient };
        if self.enhanced {
            settings.extract = ExtractConfig::for_mode(ExtractMode::Enhanced);
        }

        Ok(settings)
    }
}

fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("newsletter_core=debug,newsletter=debug"))
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Extract `source` and compose a newsletter, reporting progress.
pub(crate) async fn generate(
    pipeline: &Pipeline, source: &Source, options: &ComposeOptions, verbose: bool,
) -> anyhow::Result<Newsletter> {
    if verbose {
        print_step(1, 3, &format!("Extracting {}", source.to_string().bright_white().underline()));
    }
    let spinner = progress::extraction_spinner(source.to_string());
    let extracted = pipeline.extract(source).await;
    spinner.finish_and_clear();
    let content = extracted?;
    print_info(&format!("Extracted {} characters", content.chars().count()));
    if verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(content.len()).bright_white());
    }

    let request = pipeline.request(content, options);
    if verbose {
        print_step(
            2,
            3,
            &format!("Generating newsletter with {} for {} readers", request.model_id, request.audience),
        );
    }
    let bar = progress::GenerationBar::new();
    let composed = pipeline.compose_with_progress(&request, &bar).await;
    bar.finish();
    let newsletter = composed.context("Failed to generate newsletter")?;

    if verbose {
        print_step(3, 3, "Done");
    }
    Ok(newsletter)
}

/// Write `newsletter` as JSON to `path`.
pub(crate) fn save(newsletter: &Newsletter, path: &Path) -> anyhow::Result<()> {
    newsletter
        .save(path)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;
    print_success(&format!("Newsletter saved to: {}", path.display().bright_white()));
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = args.settings()?;
    let pipeline = Pipeline::with_ollama(settings).context("Failed to set up the model backend")?;

    if args.interactive {
        return interactive::run(&pipeline, args.verbose).await;
    }

    let Some(source) = args.source() else {
        anyhow::bail!("Please provide either --url or --file (or use --interactive)");
    };

    if args.extract_only {
        let content = pipeline.extract(&source).await?;
        print_extracted(&content);
        return Ok(());
    }

    let newsletter = generate(&pipeline, &source, &args.compose_options(), args.verbose).await?;
    print_newsletter(&newsletter);
    save(&newsletter, &args.output)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    if let Err(e) = run(args).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_and_file_conflict() {
        let result = Args::try_parse_from(["newsletter", "--url", "https://example.com", "--file", "a.pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["newsletter", "--file", "brief.docx"]).unwrap();

        assert_eq!(args.output, PathBuf::from("newsletter.json"));
        assert_eq!(args.source(), Some(Source::File(PathBuf::from("brief.docx"))));
        assert_eq!(args.compose_options(), ComposeOptions::default());
    }

    #[test]
    fn test_audience_parsing() {
        let args =
            Args::try_parse_from(["newsletter", "--url", "https://example.com", "--audience", "technical"]).unwrap();
        assert_eq!(args.audience, Some(Audience::Technical));

        assert!(Args::try_parse_from(["newsletter", "--audience", "marketing"]).is_err());
    }

    #[test]
    fn test_strict_flag_sets_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        let config = config.to_str().unwrap();

        let lenient = Args::try_parse_from(["newsletter", "--config", config]).unwrap();
        assert_eq!(lenient.settings().unwrap().compose.mode, CompositionMode::Lenient);

        let strict = Args::try_parse_from(["newsletter", "--config", config, "--strict", "--enhanced"]).unwrap();
        let settings = strict.settings().unwrap();
        assert_eq!(settings.compose.mode, CompositionMode::Strict);
        assert_eq!(settings.extract, ExtractConfig::for_mode(ExtractMode::Enhanced));
    }

    #[test]
    fn test_strict_flag_overrides_settings_file_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "[compose]\nmode = \"strict\"\n").unwrap();
        let config = config.to_str().unwrap();

        let args = Args::try_parse_from(["newsletter", "--config", config]).unwrap();
        assert_eq!(args.settings().unwrap().compose.mode, CompositionMode::Lenient);

        let help = <Args as clap::CommandFactory>::command().render_long_help().to_string();
        assert!(help.contains("whatever the settings file says"));
    }
}
