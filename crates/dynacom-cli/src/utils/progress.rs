use dynacom::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct PhaseState {
    pb: ProgressBar,
    current: Option<&'static str>,
    completed: Vec<&'static str>,
}

/// Renders workflow phases as a spinner on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that draws nothing, for tests and `--quiet` runs.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new_spinner().with_style(Self::spinner_style());
        pb.set_draw_target(target);
        Self {
            state: Arc::new(Mutex::new(PhaseState {
                pb,
                current: None,
                completed: Vec::new(),
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    state.current = Some(name);
                    state.pb.reset();
                    state.pb.set_message(format!("{name}..."));
                    state.pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    state.pb.disable_steady_tick();
                    if let Some(name) = state.current.take() {
                        state.pb.println(format!("✓ {name}"));
                        state.completed.push(name);
                    }
                    state.pb.set_message("");
                }
                Progress::Message(msg) => {
                    state.pb.println(format!("  {msg}"));
                }
            }
        })
    }

    /// Clears the spinner line once the workflow is over.
    pub fn finish(&self) {
        if let Ok(state) = self.state.lock() {
            state.pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
