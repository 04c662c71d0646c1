use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use newsletter_core::{ComposeProgress, ComposeStage};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Spinner shown while content is being extracted.
pub(crate) fn extraction_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS),
    );
    spinner.set_prefix("Extracting");
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Bar advanced once per generation call.
pub(crate) struct GenerationBar {
    bar: ProgressBar,
}

impl GenerationBar {
    pub(crate) fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  [{bar:30.green/238}] {pos}/{len}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(TICKS),
        );
        bar.set_prefix("Generating");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ComposeProgress for GenerationBar {
    fn on_compose_start(&self, total_stages: usize) {
        self.bar.set_length(total_stages as u64);
        self.bar.reset_eta();
    }

    fn on_stage_start(&self, stage: ComposeStage) {
        self.bar.set_message(stage.to_string());
    }

    fn on_stage_complete(&self, _stage: ComposeStage) {
        self.bar.inc(1);
    }
}
