//! Progress spinner for corpus scanning.

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputFormat;

/// Create a spinner progress bar with a message.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress bar template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Create a hidden progress bar (no-op).
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Spinner for human output on a terminal, hidden otherwise.
pub fn for_format(format: OutputFormat, msg: &str) -> ProgressBar {
    if format == OutputFormat::Human && crate::prompt::is_interactive() {
        spinner(msg)
    } else {
        hidden()
    }
}

/// Run `f` while `pb` spins, then clear it.
pub fn with_spinner<T>(pb: ProgressBar, f: impl FnOnce() -> T) -> T {
    let result = f();
    pb.finish_and_clear();
    result
}
