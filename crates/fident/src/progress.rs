use std::sync::LazyLock;

use fident_archive::BatchEvent;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const PB_STYLE: &str =
    "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: LazyLock<Option<ProgressStyle>> = LazyLock::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

/// One tick per finished file of a drop batch.
pub struct BatchTracker {
    pb: ProgressBar,
}

impl BatchTracker {
    pub fn new(len: usize) -> Self {
        let pb = ProgressBar::new(len as u64);
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        Self {
            pb: pb.with_prefix("Extracting"),
        }
    }

    pub fn hidden(len: usize) -> Self {
        Self {
            pb: ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::hidden()),
        }
    }

    pub fn step(&self, event: &BatchEvent) -> &Self {
        let name = event
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mark = if event.outcome.is_ok() { "ok" } else { "failed" };
        self.pb.set_message(format!("{name} {mark}"));
        self.pb.inc(1);
        self
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}
