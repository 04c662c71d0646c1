//! Menu-driven session: pick a model and audience once, then generate as
//! many newsletters as wanted until the user exits.

use std::path::PathBuf;

use anyhow::Context;
use dialoguer::Input;
use newsletter_core::{Audience, ComposeOptions, MODELS, Pipeline, Source, SourceKind};

use crate::echo::{print_banner, print_error, print_menu, print_newsletter, print_warning};
use crate::{generate, save};

/// What the user picked from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    FromUrl,
    FromFile,
    Exit,
}

impl Action {
    fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::FromUrl),
            "2" => Some(Self::FromFile),
            "3" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Zero-based index for a 1-based menu `choice`, or `default` when the
/// choice is blank or out of range.
fn menu_index(choice: &str, len: usize, default: usize) -> usize {
    match choice.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => n - 1,
        _ => default,
    }
}

fn prompt(text: &str, default: Option<&str>) -> anyhow::Result<String> {
    let mut input = Input::<String>::new().with_prompt(text).allow_empty(true);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    input.interact_text().context("Failed to read input")
}

fn choose_options() -> anyhow::Result<ComposeOptions> {
    let models: Vec<String> = MODELS.iter().map(|m| format!("{} ({})", m.id, m.name)).collect();
    print_menu("Available models:", &models);
    let choice = prompt(&format!("Choose model (1-{})", MODELS.len()), Some("1"))?;
    let model = &MODELS[menu_index(&choice, MODELS.len(), 0)];

    let audiences: Vec<String> = Audience::ALL.iter().map(|a| a.display_name().to_string()).collect();
    print_menu("Audience options:", &audiences);
    let choice = prompt("Choose audience (1-2)", Some("1"))?;
    let audience = Audience::ALL[menu_index(&choice, Audience::ALL.len(), 0)];

    let token = prompt("Enter API token (leave empty for none)", None)?;

    Ok(ComposeOptions {
        model_id: Some(model.id.to_string()),
        audience: Some(audience),
        api_token: Some(token).filter(|t| !t.trim().is_empty()),
    })
}

fn ask_source(action: Action) -> anyhow::Result<Option<Source>> {
    match action {
        Action::FromUrl => {
            let url = prompt("Enter the URL", None)?;
            Ok(Some(url.trim().to_string()).filter(|u| !u.is_empty()).map(Source::Url))
        }
        Action::FromFile => {
            let path = PathBuf::from(prompt("Enter file path (PDF or DOCX)", None)?.trim());
            if !path.is_file() {
                print_error(&format!("File not found: {}", path.display()));
                return Ok(None);
            }
            if let Err(e) = SourceKind::from_path(&path) {
                print_error(&format!("{} (only PDF and DOCX files are supported)", e));
                return Ok(None);
            }
            Ok(Some(Source::File(path)))
        }
        Action::Exit => Ok(None),
    }
}

/// Run the interactive session until the user chooses to exit.
pub async fn run(pipeline: &Pipeline, verbose: bool) -> anyhow::Result<()> {
    print_banner();
    eprintln!("🎉 Welcome to Newsletter Generator!");

    let options = choose_options()?;
    let actions = ["Generate from URL".to_string(), "Generate from file (PDF/DOCX)".to_string(), "Exit".to_string()];

    loop {
        print_menu("Choose an option:", &actions);
        let Some(action) = Action::from_choice(&prompt("Enter your choice (1-3)", None)?) else {
            print_warning("Invalid choice. Please enter 1, 2, or 3.");
            continue;
        };
        if action == Action::Exit {
            eprintln!("Goodbye! 👋");
            return Ok(());
        }

        let Some(source) = ask_source(action)? else {
            continue;
        };

        let newsletter = match generate(pipeline, &source, &options, verbose).await {
            Ok(newsletter) => newsletter,
            Err(e) => {
                print_error(&format!("{:#}", e));
                continue;
            }
        };
        print_newsletter(&newsletter);

        if prompt("Save to file? (y/n)", Some("n"))?.trim().eq_ignore_ascii_case("y") {
            let filename = prompt("Enter filename", Some("newsletter.json"))?;
            if let Err(e) = save(&newsletter, &PathBuf::from(filename.trim())) {
                print_error(&format!("{:#}", e));
            }
        }
    }
}
