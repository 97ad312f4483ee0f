use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use hostsieve_core::prober::ProgressCallback;

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const TICKS: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

/// Spinner currently on screen, if any. Log lines are routed through it so
/// they do not tear the spinner line.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active() -> Option<ProgressBar> {
    ACTIVE.lock().ok().and_then(|guard| guard.clone())
}

pub struct ProbeSpinner {
    pb: ProgressBar,
}

impl ProbeSpinner {
    /// Starts a spinner, or a hidden one when `quiet > 0`.
    pub fn start(message: &str, quiet: u8) -> Self {
        if quiet > 0 {
            return Self {
                pb: ProgressBar::hidden(),
            };
        }

        let pb: ProgressBar = ProgressBar::new_spinner();
        let style: ProgressStyle = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        pb.set_style(style);
        pb.enable_steady_tick(TICK_INTERVAL);
        pb.set_message(message.to_string());

        if let Ok(mut slot) = ACTIVE.lock() {
            *slot = Some(pb.clone());
        }
        Self { pb }
    }

    /// Callback for the prober: shows the number of completed probes.
    pub fn progress_callback(&self) -> ProgressCallback {
        let pb: ProgressBar = self.pb.clone();
        Arc::new(move |done: usize| {
            pb.set_message(format!(
                "{} probes completed... {}",
                done.to_string().green().bold(),
                "(Ctrl-C to stop early)".italic().bright_black()
            ));
        })
    }

    pub fn finish(self) {
        if let Ok(mut slot) = ACTIVE.lock() {
            *slot = None;
        }
        self.pb.finish_and_clear();
    }
}

/// Log sink: prints above the active spinner, or to stderr.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active() {
            Some(pb) => {
                let msg = String::from_utf8_lossy(buf);
                pb.println(msg.trim_end());
                Ok(buf.len())
            }
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
