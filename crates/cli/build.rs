use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("newsletter")
        .version("0.1.0")
        .author("Newsletter Contributors")
        .about("Generate newsletters from web pages and documents using a local model")
        .arg(clap::arg!(--url <URL> "URL to extract content from").conflicts_with("file"))
        .arg(
            clap::arg!(--file <FILE> "PDF or DOCX file to extract content from")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file")
                .default_value("newsletter.json")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-i --interactive "Run in interactive mode"))
        .arg(clap::arg!(--extract_only "Only extract content, skip generation"))
        .arg(clap::arg!(--model <MODEL> "Local model name (examples: gpt2, distilgpt2, EleutherAI/gpt-neo-125M)"))
        .arg(
            clap::arg!(--audience <AUDIENCE> "Audience type")
                .value_parser(["business", "technical"]),
        )
        .arg(clap::arg!(--api_token <TOKEN> "API token for hosted model backends"))
        .arg(clap::arg!(--enhanced "Use enhanced web page extraction"))
        .arg(clap::arg!(
            --strict "Fail instead of falling back when the model output is incomplete (overrides the settings file)"
        ))
        .arg(
            clap::arg!(--config <FILE> "Settings file; its compose mode is replaced by the --strict choice")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "newsletter", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "newsletter", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "newsletter", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "newsletter", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
