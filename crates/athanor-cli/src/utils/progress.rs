use athanor::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Bridges core progress events onto a single indicatif bar on stderr:
/// stages render as a spinner, unit batches as a counting bar, and failed
/// units as lines printed above the bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(Self::spinner_style());
        bar.finish_and_clear();
        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    /// A boxed callback suitable for `ProgressReporter::with_callback`.
    /// Clones of the handler share the underlying bar.
    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);

        Box::new(move |event: Progress| {
            let Ok(guard) = bar.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            Self::apply(&guard, event);
        })
    }

    fn apply(bar: &ProgressBar, event: Progress) {
        match event {
            Progress::StageStart { name } => {
                bar.reset();
                bar.set_length(0);
                bar.set_style(Self::spinner_style());
                bar.enable_steady_tick(TICK_INTERVAL);
                bar.set_message(name);
            }
            Progress::StageFinish => {
                bar.disable_steady_tick();
                bar.finish_with_message("✓ Done");
            }
            Progress::UnitsStart { total } => {
                bar.disable_steady_tick();
                bar.reset();
                bar.set_length(total);
                bar.set_style(Self::bar_style());
            }
            Progress::UnitFinished { label, failed } => {
                if failed {
                    bar.println(format!("✗ {label}"));
                }
                bar.inc(1);
            }
            Progress::UnitsFinish => {
                let remaining = bar.length().unwrap_or(0).saturating_sub(bar.position());
                if remaining > 0 {
                    bar.inc(remaining);
                }
                bar.finish();
            }
            Progress::Message(msg) => {
                if bar.is_finished() {
                    bar.set_message(msg);
                } else {
                    bar.println(format!("  {msg}"));
                }
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{bar:36.cyan/blue} {pos}/{len} units [{elapsed_precise}]")
            .expect("Failed to create bar style template")
            .progress_chars("=> ")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
