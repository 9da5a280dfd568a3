use crate::cli::Cli;
use std::path::PathBuf;
use std::time::Duration;

/// Text the child writes before exiting. The label is kept as-is even though
/// it is printed by the child.
pub const CHILD_TEXT: &str = "in parent";

/// Text the parent writes once its delay is over.
pub const PARENT_TEXT: &str = "finished";

pub const DEFAULT_DELAY_SECS: u64 = 60;
pub const DEFAULT_SAMPLE_MS: u64 = 500;

/// Resolved settings for one run of the forker.
#[derive(Debug, Clone)]
pub struct ForkerConfig {
    /// How long the parent stays alive without reaping.
    pub delay: Duration,

    pub child_text: String,
    pub parent_text: String,

    /// Sample the child's state between delay slices.
    pub observe: bool,
    pub sample_interval: Duration,

    /// Observation records go here, or to stderr when unset.
    pub events_path: Option<PathBuf>,
}

impl Default for ForkerConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            child_text: CHILD_TEXT.to_string(),
            parent_text: PARENT_TEXT.to_string(),
            observe: false,
            sample_interval: Duration::from_millis(DEFAULT_SAMPLE_MS),
            events_path: None,
        }
    }
}

impl ForkerConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            delay: Duration::from_secs(cli.delay),
            observe: cli.observe,
            sample_interval: Duration::from_millis(cli.sample_ms),
            events_path: cli.events.clone(),
            ..Self::default()
        }
    }

    /// Delay slices used while observing: full intervals, then the remainder.
    /// Produced one at a time, so a long delay with a short interval costs
    /// nothing up front.
    pub fn delay_slices(&self) -> DelaySlices {
        let step = if self.observe && !self.sample_interval.is_zero() {
            self.sample_interval
        } else {
            self.delay
        };
        DelaySlices {
            remaining: self.delay,
            step,
            done: false,
        }
    }
}

pub struct DelaySlices {
    remaining: Duration,
    step: Duration,
    done: bool,
}

impl Iterator for DelaySlices {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.done {
            return None;
        }
        if self.remaining > self.step {
            self.remaining -= self.step;
            return Some(self.step);
        }
        self.done = true;
        Some(self.remaining)
    }
}
